//! Compliance report

use super::*;
use crate::report::{self, ComplianceReport, ReportPeriod};

impl<S: StateStore> CommandExecutor<S> {
    pub fn report(
        &self,
        scope: &ProjectScope,
        period: ReportPeriod,
        now: DateTime<Utc>,
    ) -> ComplianceReport {
        report::build_report(&self.state.issues, &self.state.projects, scope, period, now)
    }
}
