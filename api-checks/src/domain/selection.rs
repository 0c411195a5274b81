//! Narrowing the catalogue by suite and scenario name.

use thiserror::Error;

use super::scenario::{Scenario, Suite};

/// Errors raised when a selection cannot be honoured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// A requested name matches no scenario in the catalogue.
    #[error("no scenario named '{name}'; use --list to see the catalogue")]
    UnknownScenario {
        /// The requested name.
        name: String,
    },
    /// The filters left nothing to run.
    #[error("the selected suites and scenarios do not overlap")]
    NothingSelected,
}

/// Suite and name filters. Empty filters select everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    suites: Vec<Suite>,
    names: Vec<String>,
}

impl Selection {
    /// Selects the whole catalogue.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Keeps only scenarios in `suites`.
    #[must_use]
    pub fn with_suites(mut self, suites: Vec<Suite>) -> Self {
        self.suites = suites;
        self
    }

    /// Keeps only scenarios named in `names` (ASCII case-insensitive).
    #[must_use]
    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = names;
        self
    }

    /// Applies the filters, keeping catalogue order.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::UnknownScenario`] for a name absent from
    /// `catalogue`, or [`SelectionError::NothingSelected`] when the suite and
    /// name filters exclude every scenario.
    ///
    /// # Examples
    ///
    /// ```
    /// use api_checks::domain::{Selection, Suite, catalogue};
    /// use loan_fixtures::FixtureRegistry;
    ///
    /// let selected = Selection::all()
    ///     .with_suites(vec![Suite::LoanDecision])
    ///     .apply(catalogue(&FixtureRegistry::canonical()))
    ///     .expect("loan scenarios exist");
    /// assert_eq!(selected.len(), 10);
    /// ```
    pub fn apply(&self, catalogue: Vec<Scenario>) -> Result<Vec<Scenario>, SelectionError> {
        if let Some(unknown) = self.names.iter().find(|name| {
            !catalogue
                .iter()
                .any(|scenario| scenario.name().eq_ignore_ascii_case(name))
        }) {
            return Err(SelectionError::UnknownScenario {
                name: unknown.clone(),
            });
        }

        let selected: Vec<Scenario> = catalogue
            .into_iter()
            .filter(|scenario| self.suites.is_empty() || self.suites.contains(&scenario.suite()))
            .filter(|scenario| {
                self.names.is_empty()
                    || self
                        .names
                        .iter()
                        .any(|name| scenario.name().eq_ignore_ascii_case(name))
            })
            .collect();

        if selected.is_empty() {
            return Err(SelectionError::NothingSelected);
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use loan_fixtures::FixtureRegistry;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::catalogue;

    #[fixture]
    fn scenarios() -> Vec<Scenario> {
        catalogue(&FixtureRegistry::canonical())
    }

    #[rstest]
    fn empty_selection_keeps_everything(scenarios: Vec<Scenario>) {
        let count = scenarios.len();

        let selected = Selection::all().apply(scenarios).expect("selects");

        assert_eq!(selected.len(), count);
    }

    #[rstest]
    #[case(Suite::LoanDecision, 10)]
    #[case(Suite::Login, 1)]
    #[case(Suite::Orders, 17)]
    fn suites_filter_by_endpoint_family(
        scenarios: Vec<Scenario>,
        #[case] suite: Suite,
        #[case] expected: usize,
    ) {
        let selected = Selection::all()
            .with_suites(vec![suite])
            .apply(scenarios)
            .expect("selects");

        assert_eq!(selected.len(), expected);
        assert!(selected.iter().all(|scenario| scenario.suite() == suite));
    }

    #[rstest]
    fn names_match_case_insensitively_in_catalogue_order(scenarios: Vec<Scenario>) {
        let selected = Selection::all()
            .with_names(vec!["Delete Order".to_owned(), "low risk".to_owned()])
            .apply(scenarios)
            .expect("selects");

        let names: Vec<&str> = selected.iter().map(Scenario::name).collect();
        assert_eq!(names, vec!["low risk", "delete order"]);
    }

    #[rstest]
    fn unknown_names_are_rejected(scenarios: Vec<Scenario>) {
        let result = Selection::all()
            .with_names(vec!["refund order".to_owned()])
            .apply(scenarios);

        assert_eq!(
            result,
            Err(SelectionError::UnknownScenario {
                name: "refund order".to_owned()
            })
        );
    }

    #[rstest]
    fn disjoint_filters_select_nothing(scenarios: Vec<Scenario>) {
        let result = Selection::all()
            .with_suites(vec![Suite::Login])
            .with_names(vec!["low risk".to_owned()])
            .apply(scenarios);

        assert_eq!(result, Err(SelectionError::NothingSelected));
    }
}
