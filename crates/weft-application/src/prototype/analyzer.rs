//! Prototype Analyzer
//!
//! Turns a [`ClassDescriptor`] into a [`ServicePrototype`]. The analysis is a
//! pure function of the descriptor, which is what makes caching it by class
//! name sound.
//!
//! ## Parameter targets
//!
//! | Declaration | Target |
//! |-------------|--------|
//! | `inject` hint on the parameter | `Service(hint)` |
//! | class-level hint for the parameter | `Service(hint)` |
//! | class-shaped type (first class member of a union) | `Service(class)` |
//! | default value, or optional | `Value` |
//! | anything else | `Unresolvable` |

use std::collections::BTreeMap;
use weft_domain::entities::{
    ClassDescriptor, InjectionPlan, ParameterDecl, ParameterPlan, ParameterTarget, ServicePrototype,
};
use weft_domain::error::{Error, Result};

/// Builds prototypes from class descriptors
pub struct PrototypeAnalyzer;

impl PrototypeAnalyzer {
    /// Analyze a class into its build plan
    ///
    /// Fails with `AutoResolve` when the class is abstract, an interface, or
    /// has no constructor.
    pub fn analyze(class: &ClassDescriptor) -> Result<ServicePrototype> {
        if !class.is_instantiable() {
            return Err(Error::auto_resolve(
                class.name(),
                format!("class is not instantiable ({:?})", class.kind()),
            ));
        }
        let constructor = class
            .constructor()
            .cloned()
            .ok_or_else(|| Error::auto_resolve(class.name(), "class has no constructor"))?;

        let parameters = Self::analyze_parameters(class.parameters(), class.hints());
        let injection_points = class
            .injection_points()
            .iter()
            .map(|point| {
                InjectionPlan::new(
                    point.name.clone(),
                    point.target.clone(),
                    point.optional,
                    point.injector.clone(),
                )
            })
            .collect();

        Ok(ServicePrototype::new(
            class.name().to_string(),
            parameters,
            injection_points,
            constructor,
        ))
    }

    /// Analyze constructor or callable parameters
    pub fn analyze_parameters(
        declarations: &[ParameterDecl],
        hints: &BTreeMap<String, String>,
    ) -> Vec<ParameterPlan> {
        declarations
            .iter()
            .enumerate()
            .map(|(position, declaration)| Self::plan_parameter(position, declaration, hints))
            .collect()
    }

    fn plan_parameter(
        position: usize,
        declaration: &ParameterDecl,
        hints: &BTreeMap<String, String>,
    ) -> ParameterPlan {
        let hint = declaration
            .inject
            .clone()
            .or_else(|| hints.get(&declaration.name).cloned());

        let target = match hint.as_deref().or_else(|| {
            declaration
                .type_hint
                .as_ref()
                .and_then(|declared| declared.first_class())
        }) {
            Some(id) => ParameterTarget::Service(id.to_string()),
            None if declaration.default.is_some() || declaration.optional => ParameterTarget::Value,
            None => ParameterTarget::Unresolvable,
        };

        ParameterPlan {
            name: declaration.name.clone(),
            position,
            declared: declaration.type_hint.clone(),
            target,
            optional: declaration.optional,
            default: declaration.default.clone(),
            hint,
        }
    }
}
