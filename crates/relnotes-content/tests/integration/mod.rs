mod append;
mod parse_praxis;
mod round_trip;
mod validation;
