use std::{
    collections::HashMap,
    sync::RwLock,
};

/// The shard's off-chain key-value store. Mutated only by [`ShardState::apply`], which runs
/// under a single RPC worker per transaction id (see the crate-level concurrency notes), so the
/// lock is held only for the brief duration of one commit.
#[derive(Default)]
pub struct ShardState {
    inner: RwLock<HashMap<String, String>>,
}

impl ShardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies every recognized `SET <key> <value>` in `operations`, in order. Operations that
    /// do not parse as `SET` (case-insensitive verb, at most three whitespace-separated tokens)
    /// are silently skipped; they were staged but never produce a state change.
    pub fn apply(&self, operations: &[String]) {
        let mut guard = self.inner.write().expect("shard state lock poisoned");
        for op in operations {
            if let Some((key, value)) = parse_set(op) {
                guard.insert(key.to_string(), value.to_string());
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.read().expect("shard state lock poisoned").get(key).cloned()
    }

    #[cfg(test)]
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.inner.read().expect("shard state lock poisoned").clone()
    }
}

/// Parses `op` as `SET <key> <value>`, splitting into at most three whitespace-separated tokens
/// so that `<value>` may itself contain spaces (any internal whitespace in the value is kept
/// verbatim, not collapsed). The verb is matched case-insensitively.
fn parse_set(op: &str) -> Option<(&str, &str)> {
    let (verb, rest) = split_first_token(op)?;
    if !verb.eq_ignore_ascii_case("set") {
        return None;
    }
    let (key, rest) = split_first_token(rest.trim_start())?;
    let value = rest.trim_start();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Splits off the first whitespace-delimited token, after trimming leading whitespace. Returns
/// `None` if `s` is empty after trimming; otherwise returns `(token, remainder)` where
/// `remainder` still carries its leading delimiter (if any) so repeated trimming composes.
fn split_first_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(i) => Some((&s[..i], &s[i..])),
        None => Some((s, "")),
    }
}

/// The per-transaction sequence of staged, not-yet-applied operations. A transaction id is
/// present here iff this shard has voted READY for it and neither `Commit` nor `Abort` has run.
#[derive(Default)]
pub struct StagingArea {
    inner: RwLock<HashMap<String, Vec<String>>>,
}

impl StagingArea {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages `operations` for `tx_id`, overwriting any previously staged operations for the
    /// same transaction. This is the overwrite policy a repeated `Prepare` uses.
    pub fn stage(&self, tx_id: &str, operations: Vec<String>) {
        self.inner
            .write()
            .expect("staging area lock poisoned")
            .insert(tx_id.to_string(), operations);
    }

    /// Removes and returns the staged operations for `tx_id`, or `None` if absent. Used by
    /// `Commit` to consume the staged entry exactly once.
    pub fn take(&self, tx_id: &str) -> Option<Vec<String>> {
        self.inner.write().expect("staging area lock poisoned").remove(tx_id)
    }

    /// Removes the staged entry for `tx_id` without applying it. Used by `Abort`/`Rollback`.
    pub fn discard(&self, tx_id: &str) {
        self.inner.write().expect("staging area lock poisoned").remove(tx_id);
    }

    #[cfg(test)]
    #[must_use]
    pub fn contains(&self, tx_id: &str) -> bool {
        self.inner.read().expect("staging area lock poisoned").contains_key(tx_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_set,
        ShardState,
        StagingArea,
    };

    #[test]
    fn parse_set_is_case_insensitive_and_keeps_value_tail() {
        assert_eq!(parse_set("SET x 42"), Some(("x", "42")));
        assert_eq!(parse_set("set x hello world"), Some(("x", "hello world")));
        assert_eq!(parse_set("Set  x   42"), Some(("x", "42")));
    }

    #[test]
    fn parse_set_rejects_malformed_operations() {
        assert_eq!(parse_set("BAD_OP"), None);
        assert_eq!(parse_set("SET x"), None);
        assert_eq!(parse_set("SET"), None);
        assert_eq!(parse_set(""), None);
    }

    #[test]
    fn commit_applies_recognized_ops_in_order_and_skips_malformed() {
        let state = ShardState::new();
        state.apply(&[
            "SET x 10".to_string(),
            "BAD_OP".to_string(),
            "SET x 20".to_string(),
        ]);
        assert_eq!(state.get("x"), Some("20".to_string()));
    }

    #[test]
    fn staging_area_overwrites_on_reprepare() {
        let staging = StagingArea::new();
        staging.stage("tx1", vec!["SET x 1".to_string()]);
        staging.stage("tx1", vec!["SET x 2".to_string()]);
        assert_eq!(staging.take("tx1"), Some(vec!["SET x 2".to_string()]));
    }

    #[test]
    fn commit_is_idempotent_because_staging_is_consumed() {
        let staging = StagingArea::new();
        let state = ShardState::new();
        staging.stage("tx1", vec!["SET x 1".to_string()]);

        let ops = staging.take("tx1").unwrap();
        state.apply(&ops);
        assert_eq!(staging.take("tx1"), None);

        // second commit: nothing staged, state unchanged
        assert_eq!(state.get("x"), Some("1".to_string()));
    }

    #[test]
    fn abort_is_idempotent() {
        let staging = StagingArea::new();
        staging.stage("tx1", vec!["SET x 1".to_string()]);
        staging.discard("tx1");
        assert!(!staging.contains("tx1"));
        staging.discard("tx1"); // no panic, no-op
    }
}
