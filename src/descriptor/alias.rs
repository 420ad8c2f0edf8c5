//! Pre-built descriptors for common argument kinds.
//!
//! `element()` and `node()` depend on whether the host provides DOM classes.
//! That capability is detected once, the first time either alias is used,
//! so the matcher never branches on the environment.
use once_cell::sync::{Lazy, OnceCell};

use super::{Descriptor, any, function, instance_of, string, union_of};
use crate::value::ClassRef;

/// DOM classes supplied by a host that has a document model.
#[derive(Debug, Clone)]
pub struct DomClasses {
    pub node: ClassRef,
    pub element: ClassRef,
}

/// What the running host can offer to descriptor aliases.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub dom: Option<DomClasses>,
}

impl Environment {
    pub fn element(&self) -> Descriptor {
        match &self.dom {
            Some(dom) => instance_of(&dom.element),
            None => any(),
        }
    }

    pub fn node(&self) -> Descriptor {
        match &self.dom {
            Some(dom) => instance_of(&dom.node),
            None => any(),
        }
    }
}

static DOM: OnceCell<DomClasses> = OnceCell::new();

static RESOLVED: Lazy<(Descriptor, Descriptor)> = Lazy::new(|| {
    let env = Environment { dom: DOM.get().cloned() };
    if env.dom.is_none() {
        tracing::debug!("no DOM classes installed; Element and Node accept any value");
    }
    (env.element(), env.node())
});

/// Register the host's DOM classes. Must run before the first call to
/// [`element`] or [`node`]; later registrations are ignored by the aliases.
/// Returns the classes back if some were already installed.
pub fn install_dom(classes: DomClasses) -> Result<(), DomClasses> {
    DOM.set(classes)
}

/// A function-valued argument.
pub fn action() -> Descriptor {
    function()
}

/// Either an action name or a function.
pub fn classic_action() -> Descriptor {
    union_of([string(), function()])
}

pub fn element() -> Descriptor {
    RESOLVED.0.clone()
}

pub fn node() -> Descriptor {
    RESOLVED.1.clone()
}

/// Alias lookup by declared name, used by the declarative form.
pub fn by_name(name: &str) -> Option<Descriptor> {
    match name {
        "Action" => Some(action()),
        "ClassicAction" => Some(classic_action()),
        "Element" => Some(element()),
        "Node" => Some(node()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::matches;
    use crate::value::Value;

    #[test]
    fn dom_aliases_degrade_to_any_without_a_dom() {
        let env = Environment::default();
        assert!(matches(&Value::Null, &env.element()).is_ok());
        assert!(matches(&Value::from(3.0), &env.node()).is_ok());
    }

    #[test]
    fn dom_aliases_check_instances_when_a_dom_exists() {
        let node = ClassRef::new("Node");
        let element = node.extend("Element");
        let env = Environment { dom: Some(DomClasses { node: node.clone(), element: element.clone() }) };

        let div = element.instantiate::<_, String>([]);
        let text = node.instantiate::<_, String>([]);
        assert!(matches(&div, &env.element()).is_ok());
        assert!(matches(&div, &env.node()).is_ok());
        assert!(matches(&text, &env.element()).is_err());
        assert!(matches(&Value::from("div"), &env.node()).is_err());
    }

    #[test]
    fn classic_action_accepts_names_and_functions() {
        assert!(matches(&Value::from("save"), &classic_action()).is_ok());
        assert!(matches(&Value::function("save"), &classic_action()).is_ok());
        assert!(matches(&Value::from(1.0), &classic_action()).is_err());
        assert!(matches(&Value::function("save"), &action()).is_ok());
        assert!(matches(&Value::from("save"), &action()).is_err());
    }

    #[test]
    fn process_aliases_accept_anything_without_a_dom() {
        let classes = crate::descriptor::dsl::ClassRegistry::new();
        let declared = crate::descriptor::dsl::parse_descriptor(&serde_json::json!("Element"), &classes).unwrap();
        for value in [Value::Null, Value::Undefined, Value::from(3.0), Value::from("div")] {
            assert!(matches(&value, &element()).is_ok());
            assert!(matches(&value, &node()).is_ok());
            assert!(matches(&value, &declared).is_ok());
        }
    }

    #[test]
    fn installing_a_dom_after_first_use_leaves_aliases_unchanged() {
        let before = element();
        let node_class = ClassRef::new("Node");
        let element_class = node_class.extend("Element");
        assert!(install_dom(DomClasses { node: node_class, element: element_class }).is_ok());

        assert_eq!(element(), before);
        assert!(matches(&Value::from("div"), &element()).is_ok());
        assert!(matches(&Value::from("div"), &node()).is_ok());
    }
}
