mod env_overrides;
