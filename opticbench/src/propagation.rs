//! The two ways of handing a ray to an ordered list of components.
//!
//! Both skip sources and isolate [`DomainError`]s per component: a failing component
//! is reported and treated as if it had not interacted.

use crate::components::{ComponentKind, OpticalComponent};
use crate::error::DomainError;
use crate::ray::Ray;

/// A component that could not interact with a ray.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentFailure {
    /// Position of the component in its list
    pub index: usize,
    pub kind: ComponentKind,
    pub error: DomainError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationOutcome {
    /// Every ray along the path, starting with the initial one
    pub rays: Vec<Ray>,
    pub failures: Vec<ComponentFailure>,
}

/// Feeds the same `ray` to every non-source component. Returned rays are dropped;
/// only side effects (camera accumulation) remain.
pub fn broadcast<C: OpticalComponent>(components: &mut [C], ray: &Ray) -> Vec<ComponentFailure> {
    let mut failures = Vec::new();

    for (index, component) in components.iter_mut().enumerate() {
        if component.is_source() {
            continue;
        }
        if let Err(error) = component.interact_with_light(ray) {
            log::debug!("{} #{} skipped this ray: {}", component.kind(), index, error);
            failures.push(ComponentFailure {
                index,
                kind: component.kind(),
                error,
            });
        }
    }

    failures
}

/// Threads `initial` through the non-source components in order.
///
/// Each component consumes the most recent ray and its output is appended to the
/// path. Propagation stops at the first component that returns no rays or fails.
pub fn chain<C: OpticalComponent>(components: &mut [C], initial: Ray) -> PropagationOutcome {
    let mut outcome = PropagationOutcome {
        rays: vec![initial],
        failures: Vec::new(),
    };

    for (index, component) in components.iter_mut().enumerate() {
        if component.is_source() {
            continue;
        }

        let Some(current) = outcome.rays.last().copied() else {
            break;
        };

        match component.interact_with_light(&current) {
            Ok(new_rays) if !new_rays.is_empty() => outcome.rays.extend(new_rays),
            Ok(_) => {
                log::trace!("Light stopped at {} #{}", component.kind(), index);
                break;
            }
            Err(error) => {
                log::debug!("{} #{} stopped the light path: {}", component.kind(), index, error);
                outcome.failures.push(ComponentFailure {
                    index,
                    kind: component.kind(),
                    error,
                });
                break;
            }
        }
    }

    outcome
}
