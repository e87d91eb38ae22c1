//! Caller roles and the capabilities each one may use
//!
//! Roles are coarse personas of the assistants that call into Finsight. The
//! role table is plain data: defaults below, overridable per role from the
//! `[roles]` config section.

mod dispatch;

pub use dispatch::{Dispatcher, Request, Response};

use crate::ConfigError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// A caller persona
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Historical performance and long-term context
    StockHistory,
    /// Current price and fundamentals
    CurrentValuation,
    /// News, narrative background and forward-looking material
    FutureOutlook,
    /// Unrestricted access
    All,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::StockHistory,
        Role::CurrentValuation,
        Role::FutureOutlook,
        Role::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::StockHistory => "stock-history",
            Role::CurrentValuation => "current-valuation",
            Role::FutureOutlook => "future-outlook",
            Role::All => "all",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown role '{}'", s))
    }
}

/// An operation a role may be granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    CheckPolicy,
    FetchRaw,
    ReduceContent,
    ReduceBatch,
    Quote,
    CompanyProfile,
    FinancialMetrics,
    CompanyNews,
    CompanyBackground,
    CompanyReport,
}

impl Capability {
    pub const ALL: [Capability; 10] = [
        Capability::CheckPolicy,
        Capability::FetchRaw,
        Capability::ReduceContent,
        Capability::ReduceBatch,
        Capability::Quote,
        Capability::CompanyProfile,
        Capability::FinancialMetrics,
        Capability::CompanyNews,
        Capability::CompanyBackground,
        Capability::CompanyReport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::CheckPolicy => "check-policy",
            Capability::FetchRaw => "fetch-raw",
            Capability::ReduceContent => "reduce-content",
            Capability::ReduceBatch => "reduce-batch",
            Capability::Quote => "quote",
            Capability::CompanyProfile => "company-profile",
            Capability::FinancialMetrics => "financial-metrics",
            Capability::CompanyNews => "company-news",
            Capability::CompanyBackground => "company-background",
            Capability::CompanyReport => "company-report",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Role to capability-set mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTable {
    grants: BTreeMap<Role, BTreeSet<Capability>>,
}

impl RoleTable {
    /// The built-in grants
    ///
    /// | role | capabilities |
    /// |------|--------------|
    /// | stock-history | company-report, company-background, quote, company-news, financial-metrics, check-policy, fetch-raw |
    /// | current-valuation | quote, company-profile, financial-metrics, company-report, check-policy |
    /// | future-outlook | company-news, reduce-content, company-background, company-report, check-policy, fetch-raw, reduce-batch |
    /// | all | everything |
    pub fn defaults() -> Self {
        use Capability::*;

        let mut grants = BTreeMap::new();
        grants.insert(
            Role::StockHistory,
            BTreeSet::from([
                CompanyReport,
                CompanyBackground,
                Quote,
                CompanyNews,
                FinancialMetrics,
                CheckPolicy,
                FetchRaw,
            ]),
        );
        grants.insert(
            Role::CurrentValuation,
            BTreeSet::from([
                Quote,
                CompanyProfile,
                FinancialMetrics,
                CompanyReport,
                CheckPolicy,
            ]),
        );
        grants.insert(
            Role::FutureOutlook,
            BTreeSet::from([
                CompanyNews,
                ReduceContent,
                CompanyBackground,
                CompanyReport,
                CheckPolicy,
                FetchRaw,
                ReduceBatch,
            ]),
        );
        grants.insert(Role::All, Capability::ALL.into_iter().collect());

        Self { grants }
    }

    /// Starts from [`RoleTable::defaults`] and replaces the grants of every
    /// role named in `overrides`
    pub fn from_config(overrides: &BTreeMap<String, Vec<Capability>>) -> Result<Self, ConfigError> {
        let mut table = Self::defaults();
        for (name, capabilities) in overrides {
            let role = name.parse::<Role>().map_err(ConfigError::Validation)?;
            tracing::debug!("Overriding capabilities of role {}", role);
            table
                .grants
                .insert(role, capabilities.iter().copied().collect());
        }
        Ok(table)
    }

    pub fn permits(&self, role: Role, capability: Capability) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|caps| caps.contains(&capability))
    }

    /// Returns the capabilities granted to `role`, in a stable order
    pub fn capabilities(&self, role: Role) -> Vec<Capability> {
        self.grants
            .get(&role)
            .map(|caps| caps.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &BTreeSet<Capability>)> {
        self.grants.iter().map(|(role, caps)| (*role, caps))
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::defaults()
    }
}
