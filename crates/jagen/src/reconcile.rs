//! Transplanting source parameter names onto a javap-derived signature
//!
//! javap dumps carry erased types and no parameter names. When the source of
//! the same class is available, constructors and methods are matched by their
//! simplified parameter types and the source names replace the placeholders.

use std::collections::HashMap;

use crate::parser_types::{ClassSignature, Params};

fn params_key(params: &Params) -> String {
    params.type_class_names().join("-")
}

fn copy_names(target: &mut Params, source: &Params) {
    for (param, named) in target.0.iter_mut().zip(source.iter()) {
        param.name.clone_from(&named.name);
    }
}

/// Copy parameter names and source lines from `source` into `target`
///
/// Returns how many constructors and methods were matched. Unmatched members
/// keep their placeholder names.
pub fn reconcile(target: &mut ClassSignature, source: &ClassSignature) -> usize {
    let mut matched = 0;

    let constructors: HashMap<String, _> = source
        .constructors
        .iter()
        .map(|c| (params_key(&c.params), c))
        .collect();

    for constructor in &mut target.constructors {
        let key = params_key(&constructor.params);
        let Some(peer) = constructors.get(&key) else {
            log::debug!("no source constructor for ({})", key);
            continue;
        };
        if peer.params.len() != constructor.params.len() {
            continue;
        }
        copy_names(&mut constructor.params, &peer.params);
        constructor.line.clone_from(&peer.line);
        matched += 1;
    }

    let methods: HashMap<String, _> = source
        .methods
        .iter()
        .map(|m| (format!("{}{}", m.name, params_key(&m.params)), m))
        .collect();

    for method in &mut target.methods {
        let key = format!("{}{}", method.name, params_key(&method.params));
        let Some(peer) = methods.get(&key) else {
            log::debug!("no source method for {}", key);
            continue;
        };
        if peer.params.len() != method.params.len() {
            continue;
        }
        copy_names(&mut method.params, &peer.params);
        method.line.clone_from(&peer.line);
        matched += 1;
    }

    log::debug!(
        "reconciled {} of {} members of {}",
        matched,
        target.constructors.len() + target.methods.len(),
        target.class_name
    );

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser_types::{ClassSigConstructor, ClassSigMethod, Param};

    fn constructor(params: &[(&str, &str)], line: &str) -> ClassSigConstructor {
        ClassSigConstructor {
            params: params.iter().map(|(n, t)| Param::new(*n, *t)).collect(),
            throws: false,
            line: line.to_string(),
        }
    }

    fn method(name: &str, params: &[(&str, &str)], line: &str) -> ClassSigMethod {
        ClassSigMethod {
            name: name.to_string(),
            params: params.iter().map(|(n, t)| Param::new(*n, *t)).collect(),
            return_type: "void".to_string(),
            line: line.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_constructor_names_transplanted() {
        let mut target = ClassSignature {
            class_name: "local.Foo".to_string(),
            constructors: vec![constructor(
                &[("a", "java.lang.String"), ("b", "int")],
                "public local.Foo(java.lang.String, int)",
            )],
            ..Default::default()
        };
        let source = ClassSignature {
            class_name: "Foo".to_string(),
            constructors: vec![constructor(
                &[("name", "String"), ("count", "int")],
                "public Foo(String name, int count)",
            )],
            ..Default::default()
        };

        assert_eq!(reconcile(&mut target, &source), 1);
        assert_eq!(target.constructors[0].params.names(), vec!["name", "count"]);
        assert_eq!(
            target.constructors[0].params.types(),
            vec!["java.lang.String", "int"]
        );
        assert_eq!(target.constructors[0].line, "public Foo(String name, int count)");
    }

    #[test]
    fn test_methods_keyed_by_name_and_types() {
        let mut target = ClassSignature {
            methods: vec![
                method("run", &[("a", "int")], "javap run(int)"),
                method("run", &[("a", "java.lang.String")], "javap run(String)"),
                method("stop", &[("a", "long")], "javap stop(long)"),
            ],
            ..Default::default()
        };
        let source = ClassSignature {
            methods: vec![
                method("run", &[("label", "String")], "src run(String)"),
                method("run", &[("times", "int")], "src run(int)"),
            ],
            ..Default::default()
        };

        assert_eq!(reconcile(&mut target, &source), 2);
        assert_eq!(target.methods[0].params.names(), vec!["times"]);
        assert_eq!(target.methods[0].line, "src run(int)");
        assert_eq!(target.methods[1].params.names(), vec!["label"]);
        // No peer: placeholders stay
        assert_eq!(target.methods[2].params.names(), vec!["a"]);
        assert_eq!(target.methods[2].line, "javap stop(long)");
    }

    #[test]
    fn test_generic_erasure_mismatch_left_alone() {
        let mut target = ClassSignature {
            methods: vec![method("put", &[("a", "java.util.Map")], "javap")],
            ..Default::default()
        };
        let source = ClassSignature {
            methods: vec![method("put", &[("values", "Map<String, Integer>")], "src")],
            ..Default::default()
        };

        assert_eq!(reconcile(&mut target, &source), 0);
        assert_eq!(target.methods[0].params.names(), vec!["a"]);
    }
}
