//! Go binding source generation
//!
//! Each Java class becomes a Go struct embedding `*javabind.Callable`.
//! Constructors become `New<Type>` factories, methods become Go methods (or
//! package level functions when static) and static fields become zero
//! argument accessors. Arguments and results that are not primitives pass
//! through the runtime's converter objects.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::filter::AbstractClassList;
use crate::java_type::{type_components, type_head, ARRAY, VARARGS};
use crate::parser_types::{ClassSigField, ClassSigMethod, Params, SignatureView};
use crate::translator::{capitalize, TypeTranslator};

/// Import path of the runtime the generated code calls into
pub const RUNTIME_IMPORT: &str = "github.com/timob/javabind";

/// Package name used when none is configured
pub const DEFAULT_PACKAGE: &str = "gojvm_gen_package";

const TO_JAVA: &str = "javabind.NewGoToJava";
const TO_GO: &str = "javabind.NewJavaToGo";

/// Dynamic type used for abstract class parameters
const ANY: &str = "interface{}";

static GO_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
        "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
        "return", "select", "struct", "switch", "type", "var",
    ])
});

/// Rename parameters that are Go keywords by appending `_gen`
fn go_identifier(name: &str) -> String {
    if GO_KEYWORDS.contains(name) {
        format!("{}_gen", name)
    } else {
        name.to_string()
    }
}

/// The runtime call family a member reads its value through
enum Access {
    Call,
    GetField,
}

/// Emits the Go source for one class signature
pub struct GoGenerator<'a> {
    translator: &'a dyn TypeTranslator,
    abstract_classes: &'a AbstractClassList,
    package_name: &'a str,
}

impl<'a> GoGenerator<'a> {
    pub fn new(
        translator: &'a dyn TypeTranslator,
        abstract_classes: &'a AbstractClassList,
        package_name: &'a str,
    ) -> Self {
        Self {
            translator,
            abstract_classes,
            package_name,
        }
    }

    /// Generate the Go source for `sig`; empty if it has no class name
    pub fn generate<V: SignatureView + ?Sized>(&self, sig: &V) -> String {
        if sig.class_name().is_empty() {
            log::debug!("no class found, nothing to generate");
            return String::new();
        }

        let java_class = sig.qualified_class_name();
        let go_class = self.translator.go_type_name(&type_head(&java_class));

        let mut body = String::new();
        body.push_str(&format!(
            "type {} struct {{\n\t*javabind.Callable\n}}\n\n",
            go_class
        ));

        for (i, constructor) in sig.constructors().into_iter().enumerate() {
            body.push_str(&format!("// {}\n", constructor.line));
            body.push_str(&format!("func New{}", go_class));
            if i > 0 {
                body.push_str(&(i + 1).to_string());
            }
            body.push_str(&format!("({}) (*{}", self.params_list(&constructor.params), go_class));
            if constructor.throws {
                body.push_str(", error");
            }
            body.push_str(") {\n");

            self.param_conversions(&mut body, &constructor.params);

            let mut args = vec![quote(&java_class)];
            args.extend(self.call_args(&constructor.params));
            let on_error = if constructor.throws {
                "return nil, err"
            } else {
                "panic(err)"
            };
            body.push_str(&format!(
                "\n\tobj, err := javabind.Env.NewInstanceStr({})\n\tif err != nil {{\n\t\t{}\n\t}}\n",
                args.join(", "),
                on_error
            ));

            self.param_cleanup(&mut body, &constructor.params);
            body.push_str(&format!(
                "\treturn &{}{{&javabind.Callable{{obj, javabind.Env}}}}",
                go_class
            ));
            if constructor.throws {
                body.push_str(", nil");
            }
            body.push_str("\n}\n\n");
        }

        let mut overloads: HashMap<&str, usize> = HashMap::new();
        for method in sig.methods() {
            let count = overloads.entry(method.name.as_str()).or_insert(0);
            *count += 1;
            self.method(&mut body, &java_class, &go_class, method, *count);
        }

        for field in sig.fields() {
            if !field.is_static {
                continue;
            }
            self.static_field(&mut body, &java_class, &go_class, field);
        }

        self.upcast(&mut body, &go_class, sig.extends_name());

        let mut out = format!("package {}\n\nimport \"{}\"\n", self.package_name, RUNTIME_IMPORT);
        for import in self.translator.imports() {
            out.push_str(&format!("import \"{}\"\n", import));
        }
        out.push('\n');
        out.push_str(&body);
        out
    }

    fn method(
        &self,
        out: &mut String,
        java_class: &str,
        go_class: &str,
        method: &ClassSigMethod,
        overload: usize,
    ) {
        let mut go_name = capitalize(&method.name);
        if overload > 1 {
            go_name.push_str(&overload.to_string());
        }

        out.push_str(&format!("// {}\n", method.line));
        if method.is_static {
            out.push_str(&format!("func {}{}", go_class, go_name));
        } else {
            out.push_str(&format!("func (jbobject *{}) {}", go_class, go_name));
        }
        out.push_str(&format!("({})", self.params_list(&method.params)));

        let ret = self.translator.translate(&method.return_type);
        match (ret.is_empty(), method.throws) {
            (false, true) => out.push_str(&format!(" ({}, error)", ret)),
            (false, false) => out.push_str(&format!(" {}", ret)),
            (true, true) => out.push_str(" error"),
            (true, false) => {}
        }
        out.push_str(" {\n");

        self.param_conversions(out, &method.params);

        out.push('\t');
        if !ret.is_empty() {
            out.push_str("jret, ");
        }
        out.push_str("err := ");
        out.push_str(&self.access_call(Access::Call, method.is_static, &method.return_type));

        let mut args = Vec::new();
        if method.is_static {
            args.push(quote(java_class));
        }
        args.push(quote(&method.name));
        if let Some(class) = self.object_class(&method.return_type) {
            args.push(quote(&class));
        }
        args.extend(self.call_args(&method.params));
        out.push_str(&format!("({})\n", args.join(", ")));

        out.push_str("\tif err != nil {\n\t\t");
        if method.throws {
            if ret.is_empty() {
                out.push_str("return err\n");
            } else {
                out.push_str(&format!("var zero {}\n\t\treturn zero, err\n", ret));
            }
        } else {
            out.push_str("panic(err)\n");
        }
        out.push_str("\t}\n");

        self.param_cleanup(out, &method.params);
        if !ret.is_empty() {
            self.return_conversion(out, &method.return_type);
            if method.throws {
                out.push_str(", nil");
            }
        } else if method.throws {
            out.push_str("\treturn nil");
        }
        out.push_str("\n}\n\n");
    }

    fn static_field(&self, out: &mut String, java_class: &str, go_class: &str, field: &ClassSigField) {
        let ret = self.translator.translate(&field.java_type);
        out.push_str(&format!(
            "func {}{}() {} {{\n",
            go_class,
            capitalize(&field.name),
            ret
        ));

        let mut args = vec![quote(java_class), quote(&field.name)];
        if let Some(class) = self.object_class(&field.java_type) {
            args.push(quote(&class));
        }
        out.push_str(&format!(
            "\tjret, err := {}({})\n",
            self.access_call(Access::GetField, field.is_static, &field.java_type),
            args.join(", ")
        ));
        out.push_str("\tif err != nil {\n\t\tpanic(err)\n\t}\n");

        self.return_conversion(out, &field.java_type);
        out.push_str("\n}\n\n");
    }

    /// `AsSuper()` view of the object as its superclass wrapper
    fn upcast(&self, out: &mut String, go_class: &str, extends: &str) {
        let head = type_head(extends);
        if head.is_empty() || head == "java.lang.Object" || !self.translator.is_callable(&head) {
            return;
        }

        // Registers the superclass as a dependency
        let super_type = self.translator.translate(extends);
        let super_class = super_type.trim_start_matches('*');

        out.push_str(&format!("// {} extends {}\n", go_class, extends));
        out.push_str(&format!(
            "func (jbobject *{}) As{}() {} {{\n\treturn &{}{{jbobject.Callable}}\n}}\n\n",
            go_class, super_class, super_type, super_class
        ));
    }

    /// `name type` pairs of a Go parameter list
    fn params_list(&self, params: &Params) -> String {
        params
            .iter()
            .map(|p| {
                let go_type = if self.abstract_classes.is_abstract(&type_head(&p.java_type)) {
                    ANY.to_string()
                } else {
                    self.translator.translate(&p.java_type)
                };
                format!("{} {}", go_identifier(&p.name), go_type)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn param_conversions(&self, out: &mut String, params: &Params) {
        let converted: Vec<_> = params
            .iter()
            .filter(|p| !self.translator.is_primitive(&p.java_type))
            .collect();

        for p in &converted {
            out.push_str(&format!(
                "\tconv_{} := {}\n",
                p.name,
                self.translator.converter_for(TO_JAVA, &p.java_type)
            ));
        }
        for p in &converted {
            out.push_str(&format!(
                "\tif err := conv_{}.Convert({}); err != nil {{\n\t\tpanic(err)\n\t}}\n",
                p.name,
                go_identifier(&p.name)
            ));
        }
    }

    fn param_cleanup(&self, out: &mut String, params: &Params) {
        for p in params.iter() {
            if !self.translator.is_primitive(&p.java_type) {
                out.push_str(&format!("\tconv_{}.CleanUp()\n", p.name));
            }
        }
    }

    /// Values handed to the runtime call, in parameter order
    fn call_args(&self, params: &Params) -> Vec<String> {
        params
            .iter()
            .map(|p| {
                if self.translator.is_primitive(&p.java_type) {
                    return go_identifier(&p.name);
                }
                let element = p
                    .java_type
                    .strip_suffix(VARARGS)
                    .or_else(|| p.java_type.strip_suffix(ARRAY));
                match element {
                    Some(element) => format!(
                        "javabind.ObjectArray(conv_{}.Value(), {})",
                        p.name,
                        quote(&type_head(element))
                    ),
                    None => format!(
                        "javabind.CastObject(conv_{}.Value(), {})",
                        p.name,
                        quote(&type_head(&p.java_type))
                    ),
                }
            })
            .collect()
    }

    fn return_conversion(&self, out: &mut String, java_type: &str) {
        if self.translator.is_primitive(java_type) {
            out.push_str("\treturn jret");
            return;
        }

        let head = type_head(java_type);
        let callable = self.translator.is_callable(&head);

        out.push_str(&format!(
            "\tretconv := {}\n",
            self.translator.converter_for(TO_GO, java_type)
        ));
        if callable {
            out.push_str("\tdst := &javabind.Callable{}\n");
        } else {
            out.push_str(&format!("\tdst := new({})\n", self.translator.translate(java_type)));
        }
        out.push_str("\tretconv.Dest(dst)\n\tif err := retconv.Convert(jret); err != nil {\n\t\tpanic(err)\n\t}\n");
        out.push_str("\tretconv.CleanUp()\n");
        if callable {
            out.push_str(&format!(
                "\treturn &{}{{dst}}",
                self.translator.go_type_name(&head)
            ));
        } else {
            out.push_str("\treturn *dst");
        }
    }

    /// `jbobject.CallInt`, `javabind.CallStaticObjArray`, `javabind.GetFieldStaticObj`, ...
    fn access_call(&self, access: Access, is_static: bool, java_type: &str) -> String {
        let mut call = String::from(if is_static { "javabind." } else { "jbobject." });
        call.push_str(match access {
            Access::Call => "Call",
            Access::GetField => "GetField",
        });
        if is_static {
            call.push_str("Static");
        }

        if self.translator.is_primitive(java_type) {
            call.push_str(&capitalize(&java_type.replace("[]", "Array")));
        } else {
            call.push_str("Obj");
            if type_head(java_type) == ARRAY {
                call.push_str("Array");
            }
        }
        call
    }

    /// Class name the runtime needs to decode an object result
    fn object_class(&self, java_type: &str) -> Option<String> {
        if self.translator.is_primitive(java_type) {
            return None;
        }
        let mut components = type_components(java_type).into_iter();
        let head = components.next()?;
        if head == ARRAY {
            return components.next();
        }
        Some(head)
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s)
}
