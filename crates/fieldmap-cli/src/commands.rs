use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use fieldmap_core::{EngineConfig, MappingEngine, MappingStrategy, OraclePolicy};
use fieldmap_model::{MappingConfiguration, SchemaNode};

use crate::cli::{InspectArgs, MapArgs, OutputFormatArg};
use crate::oracle_command::command_oracle;
use crate::summary::{print_map_summary, print_schema_table};

/// Everything `map` produced, kept for reporting.
#[derive(Debug)]
pub struct MapOutcome {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub source: SchemaNode,
    pub target: SchemaNode,
    pub strategy: MappingStrategy,
    pub oracle: String,
    pub config: MappingConfiguration,
}

pub fn run_map(args: &MapArgs) -> Result<MapOutcome> {
    let span = info_span!("map", source = %args.source.display(), target = %args.target.display());
    let _guard = span.enter();

    let engine = build_engine(args)?;
    let source = read_schema(&engine, &args.source, "source")?;
    let target = read_schema(&engine, &args.target, "target")?;
    let config = engine.generate(&source, &target);

    Ok(MapOutcome {
        source_path: args.source.clone(),
        target_path: args.target.clone(),
        source,
        target,
        strategy: engine.options().strategy,
        oracle: engine.oracle_name().to_string(),
        config,
    })
}

/// Write or print the result of [`run_map`] as requested by `args`.
pub fn emit_map(outcome: &MapOutcome, args: &MapArgs) -> Result<()> {
    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&outcome.config)
            .context("serialize mapping configuration")?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), rules = outcome.config.len(), "wrote mapping configuration");
        return Ok(());
    }
    match args.format {
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&outcome.config)
                .context("serialize mapping configuration")?;
            println!("{json}");
        }
        OutputFormatArg::Table => print_map_summary(outcome),
    }
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<SchemaNode> {
    let engine = match &args.config {
        Some(path) => MappingEngine::from_config_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => MappingEngine::default(),
    };
    let root = read_schema(&engine, &args.file, "document")?;
    match args.format {
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&root).context("serialize schema tree")?;
            println!("{json}");
        }
        OutputFormatArg::Table => print_schema_table(&root),
    }
    Ok(root)
}

/// Engine from the config file, with command-line flags taking precedence.
pub fn build_engine(args: &MapArgs) -> Result<MappingEngine> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let mut options = config.options();
    if let Some(strategy) = args.strategy {
        options = options.with_strategy(strategy.into());
    }
    if args.validate_oracle {
        options = options.with_oracle_policy(OraclePolicy::Validated);
    }

    let engine = MappingEngine::new(options);
    let engine = match (&args.oracle_command, config.synonym_table()) {
        (Some(command_line), _) => engine.with_oracle(command_oracle(command_line)?),
        (None, Some(table)) => engine.with_oracle(table),
        (None, None) => engine,
    };
    Ok(engine)
}

fn read_schema(engine: &MappingEngine, path: &Path, role: &str) -> Result<SchemaNode> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read {role} document {}", path.display()))?;
    engine
        .build_schema(&text)
        .with_context(|| format!("parse {role} document {}", path.display()))
}
