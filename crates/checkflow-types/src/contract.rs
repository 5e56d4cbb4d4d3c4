//! Parameter contracts: the declared interface of a check suite
//!
//! A [`ParameterContract`] names the parameters a suite accepts (required and
//! optional, each optionally carrying a free-form type tag) plus any
//! mutually-exclusive groups. Validation runs once per invocation, before
//! any check executes: it either rejects the supplied arguments with a
//! [`ContractError`] or binds them into an [`ExecutionContext`].
//!
//! Contracts are declared once per suite and immutable afterwards.

use crate::{ContractError, ContractResult, ExecutionContext, RunArgs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ── Parameter Declarations ───────────────────────────────────────────

/// A free-form type tag attached to a parameter declaration.
///
/// Tags are documentation for suite authors and consumers; validation does
/// not enforce them against supplied values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeTag {
    /// A single type name, e.g. `"str"` or `"int"`
    Name(String),
    /// A list of acceptable alternatives, e.g. `["str", "list"]`
    OneOf(Vec<String>),
}

/// A single declared parameter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name, unique across the contract
    pub name: String,
    /// Optional type tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<TypeTag>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: None,
        }
    }

    /// Declare a parameter with a single type name
    pub fn typed(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: Some(TypeTag::Name(tag.into())),
        }
    }

    /// Declare a parameter accepting one of several type names
    pub fn one_of<I, S>(name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            type_tag: Some(TypeTag::OneOf(tags.into_iter().map(Into::into).collect())),
        }
    }
}

/// An ordered set of parameter names of which at most (or exactly) one may
/// be supplied.
///
/// All members must come from the same declaration category. A group over
/// required parameters demands exactly one present member; a group over
/// optional parameters permits at most one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusiveGroup {
    pub members: Vec<String>,
}

impl ExclusiveGroup {
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    fn describe(&self) -> String {
        format!("({})", self.members.join(", "))
    }
}

// ── Parameter Contract ───────────────────────────────────────────────

/// The declared parameter interface of a check suite
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterContract {
    /// Parameters the caller must supply (unless covered by a group)
    pub required: Vec<ParamSpec>,
    /// Parameters the caller may supply
    pub optional: Vec<ParamSpec>,
    /// Mutually-exclusive groups over declared parameters
    pub exclusive_groups: Vec<ExclusiveGroup>,
}

impl ParameterContract {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required parameter
    pub fn require(mut self, spec: ParamSpec) -> Self {
        self.required.push(spec);
        self
    }

    /// Declare an optional parameter
    pub fn accept(mut self, spec: ParamSpec) -> Self {
        self.optional.push(spec);
        self
    }

    /// Declare a mutually-exclusive group
    pub fn exclusive(mut self, group: ExclusiveGroup) -> Self {
        self.exclusive_groups.push(group);
        self
    }

    fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|p| p.name == name)
    }

    fn is_optional(&self, name: &str) -> bool {
        self.optional.iter().any(|p| p.name == name)
    }

    fn is_declared(&self, name: &str) -> bool {
        self.is_required(name) || self.is_optional(name)
    }

    /// Validate supplied arguments against this contract.
    ///
    /// On success, binds every supplied key/value into a fresh
    /// [`ExecutionContext`] for check bodies to read by name.
    ///
    /// # Errors
    ///
    /// - [`ContractError::IllegalGroupDefinition`] for a group with fewer
    ///   than two members, an undeclared member, or members mixing the
    ///   required and optional categories. A definition error, checked
    ///   first.
    /// - [`ContractError::MutuallyExclusiveViolation`] when a required
    ///   group has zero or more than one supplied member, or an optional
    ///   group has more than one.
    /// - [`ContractError::MissingParameters`] naming every required
    ///   parameter that is neither supplied nor covered by a group.
    /// - [`ContractError::UnknownParameters`] naming every supplied
    ///   argument that is not declared.
    pub fn validate(&self, args: &RunArgs) -> ContractResult<ExecutionContext> {
        self.check_group_definitions()?;
        self.check_group_presence(args)?;
        self.check_missing(args)?;
        self.check_unknown(args)?;
        Ok(ExecutionContext::bind(args))
    }

    /// Groups must have >= 2 members, all declared, all from one category.
    fn check_group_definitions(&self) -> ContractResult<()> {
        for group in &self.exclusive_groups {
            if group.members.len() < 2 {
                return Err(ContractError::IllegalGroupDefinition(format!(
                    "group {} must have at least two members",
                    group.describe()
                )));
            }
            for member in &group.members {
                if !self.is_declared(member) {
                    return Err(ContractError::IllegalGroupDefinition(format!(
                        "group {} references undeclared parameter '{}'",
                        group.describe(),
                        member
                    )));
                }
            }
            let required_members = group.members.iter().filter(|m| self.is_required(m)).count();
            if required_members != 0 && required_members != group.members.len() {
                return Err(ContractError::IllegalGroupDefinition(format!(
                    "group {} mixes required and optional parameters",
                    group.describe()
                )));
            }
        }
        Ok(())
    }

    /// Enforce exactly-one (required groups) / at-most-one (optional groups).
    fn check_group_presence(&self, args: &RunArgs) -> ContractResult<()> {
        for group in &self.exclusive_groups {
            let present = group.members.iter().filter(|m| args.contains(m)).count();
            let required_group = self.is_required(&group.members[0]);

            if present > 1 {
                return Err(ContractError::MutuallyExclusiveViolation(format!(
                    "too many of the mutually exclusive parameters {} supplied",
                    group.describe()
                )));
            }
            if required_group && present == 0 {
                return Err(ContractError::MutuallyExclusiveViolation(format!(
                    "at least one of the mutually exclusive parameters {} is required",
                    group.describe()
                )));
            }
        }
        Ok(())
    }

    /// Required parameters outside any exclusive group must all be supplied.
    /// Offenders are reported together, not one at a time.
    fn check_missing(&self, args: &RunArgs) -> ContractResult<()> {
        let grouped: BTreeSet<&str> = self
            .exclusive_groups
            .iter()
            .flat_map(|g| g.members.iter().map(String::as_str))
            .collect();

        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|p| !args.contains(&p.name) && !grouped.contains(p.name.as_str()))
            .map(|p| p.name.clone())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ContractError::MissingParameters(missing))
        }
    }

    /// Every supplied argument must be a declared parameter.
    fn check_unknown(&self, args: &RunArgs) -> ContractResult<()> {
        let unknown: Vec<String> = args
            .names()
            .filter(|name| !self.is_declared(name))
            .map(String::from)
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ContractError::UnknownParameters(unknown))
        }
    }
}
