use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vdyp_core::prelude::*;
use vdyp_params::{build_csv_records, build_projection_parameters, generate_synthetic_identifiers};
use vdyp_tables::FileKind;
use vdyp_validation::{Finding, StandInput, StandValidator};

fn cli() -> Command {
    Command::new("vdyp-input")
        .version(vdyp_core::VERSION)
        .about("Prepare, check and submit VDYP projection input")
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Session configuration (.toml or .json)"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("validate-stand")
                .about("Check stand density values against the species curves")
                .arg(Arg::new("species").long("species").required(true).help("Highest-percent species code"))
                .arg(Arg::new("bec").long("bec").default_value("IDF").help("BEC zone"))
                .arg(Arg::new("ba").long("ba").help("Basal area (m2/ha)"))
                .arg(Arg::new("tph").long("tph").help("Trees per hectare"))
                .arg(Arg::new("height").long("height").help("Site height (m)"))
                .arg(
                    Arg::new("min-dbh")
                        .long("min-dbh")
                        .default_value("7.5 cm+")
                        .help("Minimum DBH utilization label"),
                ),
        )
        .subcommand(
            Command::new("build")
                .about("Build parameters and CSV input from a saved manual-entry state")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Manual-entry state as JSON"),
                )
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .default_value(".")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory for the generated files"),
                ),
        )
        .subcommand(
            Command::new("restore")
                .about("Show the session a saved projection restores to")
                .arg(
                    Arg::new("params")
                        .long("params")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Saved projection JSON"),
                )
                .arg(
                    Arg::new("view")
                        .long("view")
                        .action(ArgAction::SetTrue)
                        .help("Open every panel read-only"),
                ),
        )
        .subcommand(Command::new("demo").about("Run the demonstration stand against the in-memory service"))
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(matches: &ArgMatches) -> Result<SessionConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => SessionConfig::from_file(path).with_context(|| format!("loading config {}", path.display())),
        None => Ok(SessionConfig::default()),
    }
}

fn print_findings(findings: &[Finding]) {
    for finding in findings {
        let severity = if finding.blocking { "error" } else { "warning" };
        println!("{severity}: [{}] {}", finding.error_type, finding.message);
    }
}

fn validate_stand(args: &ArgMatches) -> Result<bool> {
    let get = |name: &str| args.get_one::<String>(name).map(String::as_str);
    let result = StandValidator::new().validate(&StandInput {
        species: get("species"),
        bec_zone: get("bec"),
        height: get("height"),
        basal_area: get("ba"),
        trees_per_hectare: get("tph"),
        min_dbh_limit: get("min-dbh"),
        ..StandInput::default()
    });
    let findings: Vec<Finding> = result
        .blocking
        .iter()
        .map(Finding::from)
        .chain(result.advisories.iter().map(Finding::from))
        .collect();
    if findings.is_empty() {
        println!("stand values are within the species curves");
    }
    print_findings(&findings);
    Ok(!result.is_blocked())
}

fn build(args: &ArgMatches, config: &SessionConfig) -> Result<()> {
    let input = args.get_one::<PathBuf>("input").context("--input is required")?;
    let out_dir = args.get_one::<PathBuf>("out-dir").context("--out-dir has a default")?;

    let text = std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let mut state: ModelParameterState =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", input.display()))?;
    state.recompute_species_groups();

    let params = build_projection_parameters(&state, &config.projection);
    let ids = generate_synthetic_identifiers(&mut rand::rng())?;
    let records = build_csv_records(&state, &config.projection, ids);

    std::fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    write(out_dir, "parameters.json", &params.to_json()?)?;
    write(out_dir, FileKind::Polygon.generated_file_name(), &records.polygon)?;
    write(out_dir, FileKind::Layer.generated_file_name(), &records.layer)?;
    Ok(())
}

fn write(dir: &Path, name: &str, content: &str) -> Result<()> {
    let path = dir.join(name);
    std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

fn restore(args: &ArgMatches) -> Result<()> {
    let path = args.get_one::<PathBuf>("params").context("--params is required")?;
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let saved = SavedProjection::from_json(&text).with_context(|| format!("parsing {}", path.display()))?;
    let restored = restore_session(&saved, args.get_flag("view"));
    println!("{}", serde_json::to_string_pretty(&restored)?);
    Ok(())
}

async fn demo(config: SessionConfig) -> Result<()> {
    let service = Arc::new(InMemoryProjectionService::new());
    let session = ProjectionSession::manual(ModelParameterState::with_default_values(), service, config);

    for panel in [
        PanelName::SpeciesInfo,
        PanelName::SiteInfo,
        PanelName::StandInfo,
        PanelName::ReportInfo,
    ] {
        match session.confirm(panel)? {
            ConfirmOutcome::Confirmed { advisories, .. } => {
                println!("confirmed {panel}");
                print_findings(&advisories);
            }
            ConfirmOutcome::Blocked(validation) => {
                print_findings(&validation.blocking);
                print_findings(&validation.advisories);
                bail!("{panel} could not be confirmed");
            }
        }
    }

    let handle = session.run().await?;
    println!("projection {} submitted at {}", handle.id, handle.submitted_at);
    let archive = session.fetch_results().await?;
    println!("{}", String::from_utf8_lossy(&archive));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json"));
    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("validate-stand", args)) => {
            if !validate_stand(args)? {
                std::process::exit(1);
            }
        }
        Some(("build", args)) => build(args, &config)?,
        Some(("restore", args)) => restore(args)?,
        Some(("demo", _)) => demo(config).await?,
        _ => unreachable!("subcommand is required"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let matches = cli()
            .try_get_matches_from(["vdyp-input", "restore", "--params", "saved.json", "--view", "--json"])
            .unwrap();
        assert!(matches.get_flag("json"));
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "restore");
        assert!(args.get_flag("view"));
    }
}
