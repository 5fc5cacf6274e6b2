//! Injection reports
//!
//! A dry run of what the pipeline would supply to a class, without
//! resolving, constructing or caching anything.

use crate::classes::ClassRegistry;
use crate::definitions::DefinitionStore;
use crate::prototype::PrototypeAnalyzer;
use serde::Serialize;
use weft_domain::entities::{Arguments, ClassDescriptor, ParameterTarget};
use weft_domain::error::Result;

/// How a parameter or injection point would be satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionSource {
    /// Explicit argument supplied by the caller
    Override,
    /// Consumer-specific contextual rule
    Contextual,
    /// Registered definition
    Definition,
    /// Class of the same name, autowired
    Autowire,
    /// Parameter default value
    Default,
    /// `null` for an optional parameter or a skipped optional point
    Null,
    /// Nothing; resolution would fail
    Missing,
}

/// One constructor parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterReport {
    /// Parameter name
    pub name: String,
    /// Zero-based position
    pub position: usize,
    /// Identifier the parameter depends on
    pub target: Option<String>,
    /// How it would be satisfied
    pub source: InjectionSource,
}

/// One property/setter injection point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectionPointReport {
    /// Property or setter name
    pub name: String,
    /// Identifier injected
    pub target: String,
    /// Whether a missing target is skipped
    pub optional: bool,
    /// How it would be satisfied
    pub source: InjectionSource,
}

/// Dry-run report for one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectionReport {
    /// Class name
    pub class: String,
    /// Rust type produced by the class
    pub type_name: Option<String>,
    /// Constructor parameters in order
    pub parameters: Vec<ParameterReport>,
    /// Injection points in order
    pub injection_points: Vec<InjectionPointReport>,
}

impl InjectionReport {
    /// Whether nothing is missing
    pub fn is_satisfiable(&self) -> bool {
        self.missing().is_empty()
    }

    /// Names of parameters and injection points that cannot be satisfied
    pub fn missing(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.source == InjectionSource::Missing)
            .map(|p| p.name.as_str())
            .chain(
                self.injection_points
                    .iter()
                    .filter(|p| p.source == InjectionSource::Missing)
                    .map(|p| p.name.as_str()),
            )
            .collect()
    }

    /// Report as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the report for `class`, treating the class name as the consumer
pub(crate) fn inspect(
    definitions: &DefinitionStore,
    classes: &ClassRegistry,
    class: &ClassDescriptor,
    overrides: &Arguments,
) -> Result<InjectionReport> {
    let prototype = PrototypeAnalyzer::analyze(class)?;
    let consumer = class.name();
    let lookup = |dependency: &str| -> Option<InjectionSource> {
        if definitions.contextual(consumer, dependency).is_some() {
            Some(InjectionSource::Contextual)
        } else if definitions.has(dependency) {
            Some(InjectionSource::Definition)
        } else if classes.is_instantiable(dependency) {
            Some(InjectionSource::Autowire)
        } else {
            None
        }
    };

    let parameters = prototype
        .parameters
        .iter()
        .map(|plan| {
            let source = if overrides.contains(&plan.name) {
                InjectionSource::Override
            } else {
                let resolved = match &plan.target {
                    ParameterTarget::Service(dependency) => lookup(dependency),
                    ParameterTarget::Value | ParameterTarget::Unresolvable => None,
                };
                resolved.unwrap_or(match (&plan.default, plan.optional, &plan.target) {
                    (_, _, ParameterTarget::Unresolvable) => InjectionSource::Missing,
                    (Some(_), _, _) => InjectionSource::Default,
                    (None, true, _) => InjectionSource::Null,
                    (None, false, _) => InjectionSource::Missing,
                })
            };
            ParameterReport {
                name: plan.name.clone(),
                position: plan.position,
                target: plan.dependency().map(str::to_string),
                source,
            }
        })
        .collect();

    let injection_points = prototype
        .injection_points
        .iter()
        .map(|point| InjectionPointReport {
            name: point.name.clone(),
            target: point.target.clone(),
            optional: point.optional,
            source: lookup(&point.target).unwrap_or(if point.optional {
                InjectionSource::Null
            } else {
                InjectionSource::Missing
            }),
        })
        .collect();

    Ok(InjectionReport {
        class: consumer.to_string(),
        type_name: class.type_name().map(str::to_string),
        parameters,
        injection_points,
    })
}
