//! Startup parameter resolution.
//!
//! Precedence for each field: CLI flag > environment (`BASS_P`, `BASS_Q`,
//! `BASS_M`, `BASS_PERIODS`, also read from `.env`) > built-in default.

use crate::cli::ParamArgs;
use crate::domain::{ParamField, ParameterSet};
use crate::error::AppError;

/// Environment variable consulted for a given field.
pub fn env_key(field: ParamField) -> &'static str {
    match field {
        ParamField::P => "BASS_P",
        ParamField::Q => "BASS_Q",
        ParamField::M => "BASS_M",
        ParamField::Periods => "BASS_PERIODS",
    }
}

/// Resolve the startup parameters from flags and the process environment.
pub fn params_from_env(args: &ParamArgs) -> Result<ParameterSet, AppError> {
    dotenvy::dotenv().ok();
    resolve_params(args, |key| std::env::var(key).ok())
}

/// Resolve the startup parameters with an explicit environment lookup.
pub fn resolve_params<F>(args: &ParamArgs, lookup: F) -> Result<ParameterSet, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut params = ParameterSet::default();

    for field in ParamField::ALL {
        let key = env_key(field);
        if let Some(raw) = lookup(key) {
            let value = parse_env_value(field, key, raw.trim())?;
            params = params.with_field(field, value);
        }
    }

    if let Some(p) = args.p {
        params.p = p;
    }
    if let Some(q) = args.q {
        params.q = q;
    }
    if let Some(m) = args.m {
        params.m = m;
    }
    if let Some(periods) = args.periods {
        params.periods = periods;
    }

    Ok(params)
}

fn parse_env_value(field: ParamField, key: &str, raw: &str) -> Result<f64, AppError> {
    match field {
        ParamField::Periods => raw
            .parse::<u32>()
            .map(f64::from)
            .map_err(|e| AppError::new(2, format!("Invalid {key}='{raw}': {e}"))),
        _ => raw
            .parse::<f64>()
            .map_err(|e| AppError::new(2, format!("Invalid {key}='{raw}': {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_flags_or_env() {
        let params = resolve_params(&ParamArgs::default(), lookup(&[])).unwrap();
        assert_eq!(params, ParameterSet::default());
    }

    #[test]
    fn env_overrides_defaults_and_flags_override_env() {
        let env = lookup(&[("BASS_P", "0.01"), ("BASS_Q", " 0.4 "), ("BASS_PERIODS", "30")]);
        let args = ParamArgs {
            q: Some(0.5),
            ..ParamArgs::default()
        };
        let params = resolve_params(&args, env).unwrap();
        assert_eq!(params.p, 0.01);
        assert_eq!(params.q, 0.5);
        assert_eq!(params.m, 103_000_000.0);
        assert_eq!(params.periods, 30);
    }

    #[test]
    fn unparsable_env_is_a_bad_input_error() {
        let err = resolve_params(&ParamArgs::default(), lookup(&[("BASS_M", "lots")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("BASS_M"));

        let err = resolve_params(&ParamArgs::default(), lookup(&[("BASS_PERIODS", "2.5")])).unwrap_err();
        assert!(err.message().contains("BASS_PERIODS"));
    }
}
