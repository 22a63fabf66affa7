//! The troubleshooting session state machine.
//!
//! A session walks the six-step flow: pick an appliance, describe the issue,
//! wait for the diagnosis, read it, optionally search for technicians, and
//! browse the results. Every transition validates the current step, failures
//! route back to the step the user can act on, and the error they carry is
//! cleared as soon as a new attempt starts.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::Appliance;
use crate::technician::{self, SortOrder, Technician};

/// Message recorded when a technician search succeeds but finds nothing.
pub const NO_TECHNICIANS_MESSAGE: &str =
    "Could not find any technicians nearby. Please try again later.";

/// Errors from illegal session transitions.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The requested transition is not legal from the current step.
    #[error("cannot {action} during the {step} step")]
    InvalidTransition {
        /// What was attempted.
        action: &'static str,
        /// The step the session was in.
        step: Step,
    },
}

/// Result type for session transitions.
pub type Result<T> = std::result::Result<T, FlowError>;

/// One step of the troubleshooting flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Choosing which appliance is misbehaving.
    #[default]
    SelectAppliance,
    /// Describing the issue, optionally with a photo.
    DescribeIssue,
    /// Waiting for the model's diagnosis.
    Diagnosing,
    /// Reading the diagnosis.
    ShowDiagnosis,
    /// Waiting for the technician search.
    FindingTechnicians,
    /// Browsing the technician list.
    ShowTechnicians,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelectAppliance => write!(f, "select-appliance"),
            Self::DescribeIssue => write!(f, "describe-issue"),
            Self::Diagnosing => write!(f, "diagnosing"),
            Self::ShowDiagnosis => write!(f, "show-diagnosis"),
            Self::FindingTechnicians => write!(f, "finding-technicians"),
            Self::ShowTechnicians => write!(f, "show-technicians"),
        }
    }
}

/// The state of one troubleshooting session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    step: Step,
    appliance: Option<Appliance>,
    description: String,
    diagnosis: Option<String>,
    technicians: Vec<Technician>,
    last_error: Option<String>,
    filter: String,
    sort: SortOrder,
}

impl Session {
    /// Create a session at the appliance selection step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current step.
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// The selected appliance, once one has been chosen.
    #[must_use]
    pub fn appliance(&self) -> Option<Appliance> {
        self.appliance
    }

    /// The submitted issue description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The received diagnosis, once one has arrived.
    #[must_use]
    pub fn diagnosis(&self) -> Option<&str> {
        self.diagnosis.as_deref()
    }

    /// The error recorded by the most recent failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The current technician filter query.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The current technician sort order.
    #[must_use]
    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    /// Choose the appliance and move on to describing the issue.
    ///
    /// # Errors
    ///
    /// Returns an error unless the session is at appliance selection.
    pub fn select_appliance(&mut self, appliance: Appliance) -> Result<()> {
        if self.step != Step::SelectAppliance {
            return Err(self.invalid("select an appliance"));
        }
        self.appliance = Some(appliance);
        self.step = Step::DescribeIssue;
        Ok(())
    }

    /// Submit the issue description and enter the diagnosing step.
    ///
    /// # Errors
    ///
    /// Returns an error unless the session is at the describe-issue step.
    pub fn begin_diagnosis(&mut self, description: impl Into<String>) -> Result<()> {
        if self.step != Step::DescribeIssue {
            return Err(self.invalid("submit a description"));
        }
        self.description = description.into();
        self.last_error = None;
        self.step = Step::Diagnosing;
        Ok(())
    }

    /// Record the received diagnosis and show it.
    ///
    /// # Errors
    ///
    /// Returns an error unless a diagnosis is in flight.
    pub fn diagnosis_ready(&mut self, diagnosis: impl Into<String>) -> Result<()> {
        if self.step != Step::Diagnosing {
            return Err(self.invalid("record a diagnosis"));
        }
        self.diagnosis = Some(diagnosis.into());
        self.step = Step::ShowDiagnosis;
        Ok(())
    }

    /// Record a diagnosis failure and return to the issue form.
    ///
    /// # Errors
    ///
    /// Returns an error unless a diagnosis is in flight.
    pub fn diagnosis_failed(&mut self, message: impl Into<String>) -> Result<()> {
        if self.step != Step::Diagnosing {
            return Err(self.invalid("record a diagnosis failure"));
        }
        self.last_error = Some(message.into());
        self.step = Step::DescribeIssue;
        Ok(())
    }

    /// Start the technician search from the diagnosis view.
    ///
    /// # Errors
    ///
    /// Returns an error unless the diagnosis is being shown.
    pub fn begin_search(&mut self) -> Result<()> {
        if self.step != Step::ShowDiagnosis {
            return Err(self.invalid("search for technicians"));
        }
        self.last_error = None;
        self.step = Step::FindingTechnicians;
        Ok(())
    }

    /// Record the technician search result.
    ///
    /// A non-empty list moves to the technician view. An empty list counts
    /// as a miss: the session returns to the diagnosis view with
    /// [`NO_TECHNICIANS_MESSAGE`] recorded.
    ///
    /// # Errors
    ///
    /// Returns an error unless a search is in flight.
    pub fn technicians_found(&mut self, technicians: Vec<Technician>) -> Result<()> {
        if self.step != Step::FindingTechnicians {
            return Err(self.invalid("record technician results"));
        }
        if technicians.is_empty() {
            self.last_error = Some(NO_TECHNICIANS_MESSAGE.to_string());
            self.step = Step::ShowDiagnosis;
        } else {
            self.technicians = technicians;
            self.step = Step::ShowTechnicians;
        }
        Ok(())
    }

    /// Record a technician search failure and return to the diagnosis view.
    ///
    /// # Errors
    ///
    /// Returns an error unless a search is in flight.
    pub fn search_failed(&mut self, message: impl Into<String>) -> Result<()> {
        if self.step != Step::FindingTechnicians {
            return Err(self.invalid("record a search failure"));
        }
        self.last_error = Some(message.into());
        self.step = Step::ShowDiagnosis;
        Ok(())
    }

    /// Set the technician filter query.
    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter = query.into();
    }

    /// Set the technician sort order.
    pub fn set_sort(&mut self, order: SortOrder) {
        self.sort = order;
    }

    /// The filtered, sorted view of the technician list.
    #[must_use]
    pub fn visible_technicians(&self) -> Vec<&Technician> {
        technician::visible(&self.technicians, &self.filter, self.sort)
    }

    /// Start over: back to appliance selection with everything cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn invalid(&self, action: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            action,
            step: self.step,
        }
    }
}
