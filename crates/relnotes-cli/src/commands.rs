//! Subcommand handlers.
//!
//! Every command writes to a caller-supplied writer so it can be exercised
//! in tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use relnotes_content::{
    Changelog, ReleaseNote, ReleaseNoteBuilder, ValidationOptions, is_round_trip_stable,
    load_changelog, parse_version, parse_with, preserves_content, write_changelog,
};
use relnotes_core::Error as CoreError;

use crate::cli::Command;
use crate::config::RelnotesConfig;
use crate::config_handlers::handle_config_command;
use crate::error::{Error, Result};

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command did what was asked.
    Success,
    /// The command ran, but the changelog failed a check.
    Failure,
}

/// Settings shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Explicit `--config` path.
    pub config_path: Option<String>,
    /// Loaded configuration.
    pub config: RelnotesConfig,
    /// Explicit `--file` path.
    pub file: Option<PathBuf>,
}

impl Context {
    /// Changelog path: `--file`, else `changelog.path` from the config.
    pub fn changelog_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| self.config.changelog.path.clone())
    }

    async fn load(&self) -> Result<Changelog> {
        let path = self.changelog_path();
        log::debug!("Loading changelog from {}", path.display());
        Ok(load_changelog(&path, &self.config.parse).await?)
    }

    /// Load the changelog for rewriting. Fails if rendering it back would
    /// lose any of the file's text.
    async fn load_for_rewrite(&self) -> Result<(PathBuf, Changelog)> {
        let path = self.changelog_path();
        let content = read_source(&path).await?;
        let changelog = parse_with(&content, &self.config.parse)?;
        if !preserves_content(&content, &changelog.render()) {
            return Err(Error::WouldDropContent(path));
        }
        Ok((path, changelog))
    }
}

async fn read_source(path: &Path) -> Result<String> {
    Ok(tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CoreError::io_with_path(e, path))?)
}

/// Run one subcommand.
pub async fn run<W: Write>(command: Command, ctx: &Context, out: &mut W) -> Result<Outcome> {
    match command {
        Command::Parse { json } => cmd_parse(&ctx.load().await?, json, out),
        Command::Validate { strict, json } => {
            let options = ValidationOptions {
                strict: strict || ctx.config.validate.strict,
                ..ctx.config.validate.clone()
            };
            cmd_validate(&ctx.load().await?, &options, json, out)
        }
        Command::Show { version } => {
            let changelog = ctx.load().await?;
            write!(out, "{}", changelog.find(&version)?.render())?;
            Ok(Outcome::Success)
        }
        Command::Latest => cmd_latest(&ctx.load().await?, out),
        Command::Since { version } => {
            let changelog = ctx.load().await?;
            let version = parse_version(&version)?;
            for release in changelog.since(&version) {
                writeln!(out, "{}", summary_line(release))?;
            }
            Ok(Outcome::Success)
        }
        Command::Search { term } => {
            let changelog = ctx.load().await?;
            for hit in changelog.search(&term) {
                writeln!(out, "{}\t{}\t{}", hit.version, hit.section, hit.text)?;
            }
            Ok(Outcome::Success)
        }
        Command::Fmt { check } => cmd_fmt(ctx, check).await,
        Command::Add {
            release,
            date,
            commit,
            upstream_version,
            features,
            deprecations,
            write,
        } => {
            let mut builder = ReleaseNoteBuilder::new(&release)?.build_date(date);
            if let Some(commit) = commit {
                builder = builder.source_commit(commit);
            }
            if let Some(upstream) = upstream_version {
                builder = builder.upstream_version(upstream);
            }
            for feature in features {
                builder = builder.feature(feature);
            }
            for deprecation in deprecations {
                builder = builder.deprecation(deprecation);
            }
            cmd_add(ctx, builder, write, out).await
        }
        Command::Config { action } => {
            handle_config_command(ctx, action, out)?;
            Ok(Outcome::Success)
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

fn cmd_parse<W: Write>(changelog: &Changelog, json: bool, out: &mut W) -> Result<Outcome> {
    if json {
        serde_json::to_writer_pretty(&mut *out, &changelog.records())?;
        writeln!(out)?;
    } else {
        for release in changelog.releases() {
            writeln!(out, "{}", summary_line(release))?;
        }
    }
    Ok(Outcome::Success)
}

fn cmd_validate<W: Write>(
    changelog: &Changelog,
    options: &ValidationOptions,
    json: bool,
    out: &mut W,
) -> Result<Outcome> {
    let report = changelog.validate(options);
    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        for issue in &report.issues {
            writeln!(out, "{issue}")?;
        }
        writeln!(
            out,
            "{} release(s): {} error(s), {} warning(s)",
            changelog.len(),
            report.errors().count(),
            report.warnings().count()
        )?;
    }
    Ok(if report.is_ok() {
        Outcome::Success
    } else {
        Outcome::Failure
    })
}

fn cmd_latest<W: Write>(changelog: &Changelog, out: &mut W) -> Result<Outcome> {
    let release = changelog
        .latest()
        .ok_or_else(|| CoreError::not_found("latest"))?;
    writeln!(out, "version: {}", release.version())?;
    writeln!(
        out,
        "build date: {}",
        release.build_date().map(|d| d.as_str()).unwrap_or("-")
    )?;
    writeln!(out, "commit: {}", release.source_commit().unwrap_or("-"))?;
    Ok(Outcome::Success)
}

async fn cmd_fmt(ctx: &Context, check: bool) -> Result<Outcome> {
    if check {
        let path = ctx.changelog_path();
        let content = read_source(&path).await?;
        if !is_round_trip_stable(&content, &ctx.config.parse)? {
            return Err(Error::NotFormatted(path));
        }
        log::info!("{} is canonical", path.display());
        return Ok(Outcome::Success);
    }
    let (path, changelog) = ctx.load_for_rewrite().await?;
    write_changelog(&path, &changelog).await?;
    Ok(Outcome::Success)
}

async fn cmd_add<W: Write>(
    ctx: &Context,
    builder: ReleaseNoteBuilder,
    write: bool,
    out: &mut W,
) -> Result<Outcome> {
    let release = builder.build(&ctx.config.parse, &ctx.config.render)?;
    if write {
        let (path, mut changelog) = ctx.load_for_rewrite().await?;
        changelog.prepend(release)?;
        write_changelog(&path, &changelog).await?;
    } else {
        let mut changelog = ctx.load().await?;
        changelog.prepend(release)?;
        write!(out, "{}", changelog.render())?;
    }
    Ok(Outcome::Success)
}

fn summary_line(release: &ReleaseNote) -> String {
    let date = release.build_date().map(|d| d.as_str()).unwrap_or("-");
    let commit: String = release
        .source_commit()
        .map(|c| c.chars().take(7).collect())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}\t{}\t{}\t{} feature(s), {} deprecation(s)",
        release.version(),
        date,
        commit,
        release.features().len(),
        release.deprecations().len()
    )
}

// ============================================================================
// Tests
// ============================================================================
