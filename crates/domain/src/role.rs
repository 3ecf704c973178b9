//! Role names, their stable numeric codes, and the role state machine.

use std::collections::BTreeSet;
use std::str::FromStr;

use schoolhub_core::AppError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Closed set of roles a principal can hold.
///
/// Declaration order is the canonical order used when role sets are
/// serialized, so tokens and responses list roles deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    /// School administrator. Manages accounts and role grants.
    Admin,
    /// Teaching staff.
    Teacher,
    /// School nurse, owns health records.
    Nurse,
    /// Discipline office staff.
    Discipline,
    /// System maintainer. May only grant or revoke `admin`.
    Maintainer,
    /// Default state of a self-registered account awaiting activation.
    Inactive,
}

impl RoleName {
    /// Returns the stable storage and transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Nurse => "nurse",
            Self::Discipline => "discipline",
            Self::Maintainer => "maintainer",
            Self::Inactive => "inactive",
        }
    }

    /// Returns the numeric code embedded in access tokens.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::Admin => 6794,
            Self::Teacher => 2938,
            Self::Nurse => 4923,
            Self::Discipline => 9029,
            Self::Maintainer => 1847,
            Self::Inactive => 212,
        }
    }

    /// Resolves a numeric code back to its role.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::all().iter().copied().find(|role| role.code() == code)
    }

    /// Returns every defined role.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[RoleName] = &[
            RoleName::Admin,
            RoleName::Teacher,
            RoleName::Nurse,
            RoleName::Discipline,
            RoleName::Maintainer,
            RoleName::Inactive,
        ];

        ALL
    }

    /// Returns `true` for every role other than `inactive`.
    #[must_use]
    pub fn is_functional(&self) -> bool {
        !matches!(self, Self::Inactive)
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "teacher" => Ok(Self::Teacher),
            "nurse" => Ok(Self::Nurse),
            "discipline" => Ok(Self::Discipline),
            "maintainer" => Ok(Self::Maintainer),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

/// Stateless lookups between role names and role codes.
///
/// Lookups are permissive: unrecognized names or codes are dropped from the
/// output rather than failing the call. Every drop is logged at `warn` so a
/// typo upstream stays diagnosable.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleCodeRegistry;

impl RoleCodeRegistry {
    /// Maps role names to codes, preserving input order.
    #[must_use]
    pub fn codes_for_names<S: AsRef<str>>(names: &[S]) -> Vec<i32> {
        names
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                match RoleName::from_str(name) {
                    Ok(role) => Some(role.code()),
                    Err(_) => {
                        warn!(role_name = name, "dropping unrecognized role name");
                        None
                    }
                }
            })
            .collect()
    }

    /// Maps role codes to names, preserving input order.
    #[must_use]
    pub fn names_for_codes(codes: &[i32]) -> Vec<RoleName> {
        codes
            .iter()
            .filter_map(|code| {
                let role = RoleName::from_code(*code);
                if role.is_none() {
                    warn!(role_code = *code, "dropping unrecognized role code");
                }
                role
            })
            .collect()
    }

    /// Returns whether `code` belongs to a defined role.
    #[must_use]
    pub fn is_valid_code(code: i32) -> bool {
        RoleName::from_code(code).is_some()
    }
}

/// Requested change to a principal's role grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleTransition {
    /// Grant the role.
    Assign(RoleName),
    /// Revoke the role.
    Remove(RoleName),
}

/// Effective role grants of a principal.
///
/// `Inactive` and functional roles never coexist, and the grant set is never
/// empty: a principal without functional roles is `Inactive`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleState {
    /// Awaiting activation by an administrator.
    Inactive,
    /// Holds one or more functional roles.
    Active(BTreeSet<RoleName>),
}

impl RoleState {
    /// Normalizes persisted grants into a coherent state.
    ///
    /// Any functional role takes precedence over a stored `inactive` grant.
    pub fn from_granted(granted: impl IntoIterator<Item = RoleName>) -> Self {
        let functional: BTreeSet<RoleName> = granted
            .into_iter()
            .filter(RoleName::is_functional)
            .collect();

        if functional.is_empty() {
            Self::Inactive
        } else {
            Self::Active(functional)
        }
    }

    /// Returns the state that results from applying `transition`.
    #[must_use]
    pub fn apply(&self, transition: RoleTransition) -> Self {
        match (self, transition) {
            (_, RoleTransition::Assign(RoleName::Inactive)) => Self::Inactive,
            (Self::Inactive, RoleTransition::Assign(role)) => {
                Self::Active(BTreeSet::from([role]))
            }
            (Self::Active(roles), RoleTransition::Assign(role)) => {
                let mut roles = roles.clone();
                roles.insert(role);
                Self::Active(roles)
            }
            (Self::Inactive, RoleTransition::Remove(_)) => Self::Inactive,
            (Self::Active(roles), RoleTransition::Remove(role)) => {
                let mut roles = roles.clone();
                roles.remove(&role);
                Self::from_granted(roles)
            }
        }
    }

    /// Returns the granted role names in canonical order.
    #[must_use]
    pub fn role_names(&self) -> Vec<RoleName> {
        match self {
            Self::Inactive => vec![RoleName::Inactive],
            Self::Active(roles) => roles.iter().copied().collect(),
        }
    }

    /// Returns the granted role codes in canonical order.
    #[must_use]
    pub fn role_codes(&self) -> Vec<i32> {
        self.role_names().iter().map(RoleName::code).collect()
    }

    /// Returns whether the state grants `role`.
    #[must_use]
    pub fn holds(&self, role: RoleName) -> bool {
        match self {
            Self::Inactive => role == RoleName::Inactive,
            Self::Active(roles) => roles.contains(&role),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::io;
    use std::sync::{Arc, Mutex};

    use proptest::prelude::*;
    use tracing::Level;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct LogSink(Arc<Mutex<Vec<u8>>>);

    struct LogSinkWriter(Arc<Mutex<Vec<u8>>>);

    impl<'a> MakeWriter<'a> for LogSink {
        type Writer = LogSinkWriter;

        fn make_writer(&'a self) -> Self::Writer {
            LogSinkWriter(Arc::clone(&self.0))
        }
    }

    impl io::Write for LogSinkWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let mut guard = self
                .0
                .lock()
                .map_err(|_| io::Error::other("log sink poisoned"))?;
            guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn warnings_during<T>(operation: impl FnOnce() -> T) -> (T, String) {
        let sink = LogSink::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(sink.clone())
            .with_ansi(false)
            .with_max_level(Level::WARN)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, operation);
        let output = sink
            .0
            .lock()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();
        (result, output)
    }

    #[test]
    fn dropped_role_name_is_logged() {
        let (codes, output) =
            warnings_during(|| RoleCodeRegistry::codes_for_names(&["teacher", "bogus"]));

        assert_eq!(codes, vec![2938]);
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("dropping unrecognized role name"), "{output}");
        assert!(output.contains("bogus"), "{output}");
    }

    #[test]
    fn dropped_role_code_is_logged() {
        let (names, output) = warnings_during(|| RoleCodeRegistry::names_for_codes(&[7, 6794]));

        assert_eq!(names, vec![RoleName::Admin]);
        assert!(output.contains("dropping unrecognized role code"), "{output}");
        assert!(output.contains("role_code=7"), "{output}");
    }

    #[test]
    fn known_names_map_without_warnings() {
        let (_, output) =
            warnings_during(|| RoleCodeRegistry::codes_for_names(&["nurse", "discipline"]));

        assert!(output.is_empty(), "{output}");
    }

    #[test]
    fn observed_codes_are_stable() {
        assert_eq!(RoleName::Admin.code(), 6794);
        assert_eq!(RoleName::Teacher.code(), 2938);
        assert_eq!(RoleName::Nurse.code(), 4923);
        assert_eq!(RoleName::Discipline.code(), 9029);
        assert_eq!(RoleName::Maintainer.code(), 1847);
        assert_eq!(RoleName::Inactive.code(), 212);
    }

    #[test]
    fn codes_are_pairwise_distinct() {
        let codes: HashSet<i32> = RoleName::all().iter().map(RoleName::code).collect();
        assert_eq!(codes.len(), RoleName::all().len());
    }

    #[test]
    fn every_name_survives_a_round_trip() {
        for role in RoleName::all() {
            let codes = RoleCodeRegistry::codes_for_names(&[role.as_str()]);
            assert_eq!(RoleCodeRegistry::names_for_codes(&codes), vec![*role]);
        }
    }

    #[test]
    fn unknown_name_is_dropped() {
        assert!(RoleCodeRegistry::codes_for_names(&["bogus"]).is_empty());
    }

    #[test]
    fn unknown_code_is_dropped() {
        assert!(RoleCodeRegistry::names_for_codes(&[999_999]).is_empty());
        assert!(!RoleCodeRegistry::is_valid_code(999_999));
    }

    #[test]
    fn mixed_input_keeps_known_entries_in_order() {
        let codes = RoleCodeRegistry::codes_for_names(&["nurse", "typo", "admin"]);
        assert_eq!(codes, vec![4923, 6794]);
    }

    #[test]
    fn assigning_functional_role_activates() {
        let state = RoleState::Inactive.apply(RoleTransition::Assign(RoleName::Teacher));
        assert_eq!(state.role_names(), vec![RoleName::Teacher]);
        assert!(!state.holds(RoleName::Inactive));
    }

    #[test]
    fn assigning_twice_is_idempotent() {
        let once = RoleState::Inactive.apply(RoleTransition::Assign(RoleName::Teacher));
        let twice = once.apply(RoleTransition::Assign(RoleName::Teacher));
        assert_eq!(once, twice);
        assert_eq!(twice.role_names(), vec![RoleName::Teacher]);
    }

    #[test]
    fn removing_last_functional_role_deactivates() {
        let state = RoleState::Inactive
            .apply(RoleTransition::Assign(RoleName::Nurse))
            .apply(RoleTransition::Remove(RoleName::Nurse));
        assert_eq!(state, RoleState::Inactive);
        assert_eq!(state.role_codes(), vec![212]);
    }

    #[test]
    fn assigning_inactive_clears_functional_roles() {
        let state = RoleState::from_granted([RoleName::Admin, RoleName::Teacher])
            .apply(RoleTransition::Assign(RoleName::Inactive));
        assert_eq!(state, RoleState::Inactive);
    }

    #[test]
    fn removing_inactive_keeps_state_inactive() {
        let state = RoleState::Inactive.apply(RoleTransition::Remove(RoleName::Inactive));
        assert_eq!(state, RoleState::Inactive);
    }

    #[test]
    fn stored_inactive_grant_is_ignored_next_to_functional_role() {
        let state = RoleState::from_granted([RoleName::Inactive, RoleName::Discipline]);
        assert_eq!(state.role_names(), vec![RoleName::Discipline]);
    }

    fn any_role() -> impl Strategy<Value = RoleName> {
        prop::sample::select(RoleName::all().to_vec())
    }

    fn any_transition() -> impl Strategy<Value = RoleTransition> {
        prop_oneof![
            any_role().prop_map(RoleTransition::Assign),
            any_role().prop_map(RoleTransition::Remove),
        ]
    }

    proptest! {
        #[test]
        fn names_and_codes_form_a_bijection(role in any_role()) {
            prop_assert_eq!(RoleName::from_code(role.code()), Some(role));
            prop_assert_eq!(RoleName::from_str(role.as_str()).ok(), Some(role));
        }

        #[test]
        fn transitions_never_mix_inactive_with_functional_roles(
            transitions in prop::collection::vec(any_transition(), 0..24),
        ) {
            let state = transitions
                .into_iter()
                .fold(RoleState::Inactive, |state, transition| state.apply(transition));
            let names = state.role_names();

            prop_assert!(!names.is_empty());
            if names.contains(&RoleName::Inactive) {
                prop_assert_eq!(names, vec![RoleName::Inactive]);
            }
        }
    }
}
