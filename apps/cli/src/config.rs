//! Parameter files and command-line arguments.

use anyhow::{bail, Context, Result};
use sim_core::Parameters;
use std::fs;
use std::path::{Path, PathBuf};

/// How the finished history is written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One formatted line per period.
    #[default]
    Table,
    /// The full history as a JSON list of period records.
    Json,
    /// One JSON array per field, aligned by period.
    Series,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "series" => Ok(OutputFormat::Series),
            other => bail!("unknown format '{other}' (expected table, json or series)"),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub steps: Option<u32>,
    pub format: OutputFormat,
    pub summary: bool,
}

pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                let path = it.next().context("--config needs a path")?;
                out.config = Some(PathBuf::from(path));
            }
            "--steps" => {
                let n = it.next().context("--steps needs a value")?;
                out.steps = Some(n.parse().with_context(|| format!("invalid --steps '{n}'"))?);
            }
            "--format" => {
                let f = it.next().context("--format needs a value")?;
                out.format = f.parse()?;
            }
            "--summary" => out.summary = true,
            other => bail!("unrecognized argument '{other}'"),
        }
    }
    Ok(out)
}

/// Parse parameters from YAML or JSON text. Missing fields keep defaults.
pub fn parse_parameters(text: &str, yaml: bool) -> Result<Parameters> {
    let params = if yaml {
        serde_yaml::from_str(text)?
    } else {
        serde_json::from_str(text)?
    };
    Ok(params)
}

/// Load a parameter file; `.yaml`/`.yml` is read as YAML, anything else as JSON.
pub fn load_parameters(path: &Path) -> Result<Parameters> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    parse_parameters(&text, yaml).with_context(|| format!("parsing {}", path.display()))
}

/// Resolve the run parameters: file (or defaults), then CLI overrides.
pub fn resolve_parameters(args: &CliArgs) -> Result<Parameters> {
    let mut params = match &args.config {
        Some(path) => load_parameters(path)?,
        None => Parameters::default(),
    };
    if let Some(steps) = args.steps {
        params.time_steps = steps;
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_all_flags() {
        let a = parse_args(args(&[
            "--config",
            "run.yaml",
            "--steps",
            "25",
            "--format",
            "series",
            "--summary",
        ]))
        .unwrap();
        assert_eq!(a.config, Some(PathBuf::from("run.yaml")));
        assert_eq!(a.steps, Some(25));
        assert_eq!(a.format, OutputFormat::Series);
        assert!(a.summary);
    }

    #[test]
    fn no_flags_means_defaults() {
        let a = parse_args(Vec::new()).unwrap();
        assert_eq!(a, CliArgs::default());
        assert_eq!(resolve_parameters(&a).unwrap(), Parameters::default());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(args(&["--steps", "ten"])).is_err());
        assert!(parse_args(args(&["--format", "xml"])).is_err());
        assert!(parse_args(args(&["--steps"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
    }

    #[test]
    fn yaml_overrides_only_named_fields() {
        let p = parse_parameters("initial_budget: 5000\nthreshold_revenue: 250.5\n", true).unwrap();
        assert_eq!(p.initial_budget, 5000.0);
        assert_eq!(p.threshold_revenue, 250.5);
        assert_eq!(p.energy_cost, 10.0);
    }

    #[test]
    fn steps_flag_overrides_file() {
        let path = std::env::temp_dir().join(format!("econ-sim-{}.json", std::process::id()));
        fs::write(&path, r#"{"time_steps": 4, "material_cost": 8}"#).unwrap();
        let a = CliArgs {
            config: Some(path.clone()),
            steps: Some(7),
            ..CliArgs::default()
        };
        let p = resolve_parameters(&a).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(p.time_steps, 7);
        assert_eq!(p.material_cost, 8.0);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_parameters(Path::new("/nonexistent/params.yaml")).unwrap_err();
        assert!(err.to_string().contains("reading"));
    }
}
