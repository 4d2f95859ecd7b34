//! Environment-variable configuration loading shared by the coordinator and shard binaries.
//!
//! A service defines one `#[derive(Deserialize)]` struct, implements [`Config`] on it to name
//! its environment variable prefix, and calls [`get`] at startup. All fields must be satisfied
//! by `<PREFIX><FIELD_NAME>` environment variables; unknown `<PREFIX>*` variables are rejected so
//! typos in deployment manifests surface immediately instead of silently falling back to
//! defaults.

use figment::{
    providers::{
        Env,
        Serialized,
    },
    Figment,
};
use serde::{
    de::DeserializeOwned,
    Serialize,
};

/// Implemented by a service's top-level config struct.
///
/// `PREFIX` is prepended to every field name (upper-cased) to form the environment variable read
/// for that field, e.g. a `shard_id` field on a config with `PREFIX = "TPC_SHARD_"` is read from
/// `TPC_SHARD_SHARD_ID`.
pub trait Config: DeserializeOwned + Serialize {
    const PREFIX: &'static str;
}

/// Reads a `C` from the process environment, failing on missing, malformed, or unrecognized
/// (i.e. `PREFIX`-matching but not a field of `C`) variables.
///
/// # Errors
/// Returns an error if a required variable is missing, cannot be deserialized into its field
/// type, or if an environment variable carrying the config's prefix does not match any field.
pub fn get<C: Config>() -> Result<C, figment::Error> {
    get_with_prefix(C::PREFIX)
}

fn get_with_prefix<C: Config>(prefix: &str) -> Result<C, figment::Error> {
    Figment::new()
        .merge(Env::prefixed(prefix))
        .extract()
}

/// Test helpers for asserting that a service's `local.env.example` file stays in sync with its
/// `Config` struct. Intended to be called from a `#[test]` in the service crate.
pub mod tests {
    use figment::Jail;
    use once_cell::sync::Lazy;
    use regex::Regex;

    use super::{
        get_with_prefix,
        Config,
    };

    static RE_LEADING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[[:space:]]+").unwrap());
    static RE_TRAILING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[[:space:]]+$").unwrap());

    fn populate_environment_from_example(jail: &mut Jail, test_prefix: &str, example_env: &str) {
        for line in example_env.lines() {
            let Some((key, val)) = line.trim().split_once('=') else {
                continue;
            };
            assert!(
                !(RE_TRAILING_WS.is_match(key) || RE_LEADING_WS.is_match(val)),
                "env vars must not contain spaces around `=`\n{line}"
            );
            jail.set_env(format!("{test_prefix}{key}"), val.trim_matches('"'));
        }
    }

    /// Asserts that every field of `C` is covered by `example_env`, and vice versa.
    #[track_caller]
    pub fn example_env_config_is_up_to_date<C: Config>(example_env: &str) {
        Jail::expect_with(|jail| {
            populate_environment_from_example(jail, C::PREFIX, example_env);
            get_with_prefix::<C>(C::PREFIX).unwrap();
            Ok(())
        });
    }

    /// Asserts that an environment variable carrying the config prefix but matching no field of
    /// `C` is rejected.
    #[track_caller]
    pub fn config_rejects_unknown_var<C: Config>(example_env: &str) {
        Jail::expect_with(|jail| {
            populate_environment_from_example(jail, C::PREFIX, example_env);
            jail.set_env(format!("{}NOT_A_REAL_FIELD", C::PREFIX), "value");
            get_with_prefix::<C>(C::PREFIX).unwrap_err();
            Ok(())
        });
    }
}
