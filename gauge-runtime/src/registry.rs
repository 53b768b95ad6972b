//! Function Registry

use crate::{EvalContext, FunctionMeta, FunctionPlugin, Value};
use gauge_core::GaugeError;
use std::collections::HashMap;
use std::sync::Arc;

/// Central function registry
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn FunctionPlugin>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn call_function(&self, name: &str, args: &[Value], ctx: &EvalContext) -> Value {
        match self.get_function(name) {
            Some(f) => f.call(args, ctx),
            None => {
                // Find similar function names for better error message
                let similar = self.find_similar_functions(name);
                let mut err = GaugeError::undefined_func(name);
                if let Some(best) = similar.first() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err
                        .with_suggestion(format!(
                            "Similar: {}. Use help() for full list.",
                            suggestions.join(", ")
                        ))
                        .with_example(format!("{}(1)", best));
                }
                Value::Error(err)
            }
        }
    }

    /// Find function names similar to the given name (for error suggestions)
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self.functions.keys()
            .filter_map(|func_name| {
                let score = Self::similarity_score(&name_lower, func_name);
                if score > 0 {
                    Some((func_name.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        // Higher score first, then alphabetical for stable output
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    /// Calculate similarity score between two strings
    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        // Exact prefix match is best
        if candidate.starts_with(query) {
            score += 100;
        }
        // Contains the query
        else if candidate.contains(query) {
            score += 50;
        }
        // Query contains the candidate
        else if query.contains(candidate) {
            score += 30;
        }

        // Regional spellings differ by a letter or two (metres/meters)
        let distance = gauge_units::diagnostics::edit_distance(query, candidate);
        if distance <= 2 {
            score += 60 - 20 * distance;
        }

        if score == 0 {
            return 0;
        }

        // Penalize length difference
        let len_diff = query.len().abs_diff(candidate.len());
        if len_diff < 5 {
            score += 5 - len_diff;
        }

        score
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        match self.functions.get(&name.to_lowercase()) {
            Some(f) => Self::function_to_help(f.meta()),
            None => Value::Error(GaugeError::undefined_func(name)),
        }
    }

    fn general_help(&self) -> Value {
        let mut funcs_by_cat: HashMap<String, Vec<String>> = HashMap::new();
        for (name, f) in &self.functions {
            let cat = f.meta().category.to_string();
            funcs_by_cat.entry(cat).or_default().push(name.clone());
        }
        for names in funcs_by_cat.values_mut() {
            names.sort();
        }

        Value::object([
            ("functions", Value::Object(funcs_by_cat.into_iter()
                .map(|(k, v)| (k, Value::List(v.into_iter().map(Value::Text).collect())))
                .collect())),
            ("usage", Value::from("Call help('function_name') for detailed help.")),
        ])
    }

    fn function_to_help(meta: FunctionMeta) -> Value {
        Value::object([
            ("name", Value::from(meta.name)),
            ("type", Value::from("function")),
            ("description", Value::from(meta.description)),
            ("usage", Value::from(meta.usage)),
            ("returns", Value::from(meta.returns)),
            ("category", Value::from(meta.category)),
            ("args", Value::List(meta.args.iter().map(|a| {
                Value::object([
                    ("name", Value::from(a.name)),
                    ("type", Value::from(a.typ)),
                    ("description", Value::from(a.description)),
                    ("optional", Value::Bool(a.optional)),
                ])
            }).collect())),
            ("examples", Value::List(
                meta.examples.iter().map(|e| Value::from(*e)).collect()
            )),
            ("related", Value::List(
                meta.related.iter().map(|r| Value::from(*r)).collect()
            )),
        ])
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        let mut names: Vec<&String> = self.functions.iter()
            .filter(|(_, f)| category.map_or(true, |c| f.meta().category == c))
            .map(|(name, _)| name)
            .collect();
        names.sort();

        Value::List(names.into_iter()
            .filter_map(|name| self.functions.get(name))
            .map(|f| {
                let meta = f.meta();
                Value::object([
                    ("name", Value::from(meta.name)),
                    ("description", Value::from(meta.description)),
                    ("usage", Value::from(meta.usage)),
                    ("category", Value::from(meta.category)),
                ])
            })
            .collect())
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArgMeta;
    use gauge_core::codes;

    struct Double;

    static DOUBLE_ARGS: [ArgMeta; 1] = [ArgMeta::required("x", "Number", "Value to double")];

    impl FunctionPlugin for Double {
        fn meta(&self) -> FunctionMeta {
            FunctionMeta {
                name: "double",
                description: "Double a number",
                usage: "double(x)",
                args: &DOUBLE_ARGS,
                returns: "Number",
                examples: &["double(2) → 4"],
                category: "test",
                related: &[],
            }
        }

        fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
            match args.first().and_then(|v| v.as_number()) {
                Some(n) => Value::Number(n.add(n)),
                None => Value::Error(GaugeError::arg_type("double", "x", "Number", "nothing")),
            }
        }
    }

    #[test]
    fn test_call_registered_function() {
        let registry = FunctionRegistry::new().with_function(Double);
        let result = registry.call_function("DOUBLE", &[Value::from(21)], &EvalContext::new());
        assert_eq!(result, Value::from(42));
    }

    #[test]
    fn test_unknown_function_suggests() {
        let registry = FunctionRegistry::new().with_function(Double);
        let result = registry.call_function("doubel", &[], &EvalContext::new());
        let err = result.as_error().unwrap();
        assert_eq!(err.code, codes::UNDEFINED_FUNC);
        assert!(err.suggestion.as_ref().unwrap().contains("double"));
        assert_eq!(err.example.as_deref(), Some("double(1)"));
    }

    #[test]
    fn test_unknown_function_without_match() {
        let registry = FunctionRegistry::new().with_function(Double);
        let result = registry.call_function("zzz", &[], &EvalContext::new());
        assert!(result.as_error().unwrap().suggestion.is_none());
    }

    #[test]
    fn test_help() {
        let registry = FunctionRegistry::new().with_function(Double);
        let help = registry.help(Some("double"));
        assert_eq!(help.get("usage"), Value::from("double(x)"));
        assert!(registry.help(Some("nope")).is_error());
        let general = registry.help(None);
        assert!(matches!(general.get("functions").get("test"), Value::List(ref names) if names.len() == 1));
    }

    #[test]
    fn test_list_functions() {
        let registry = FunctionRegistry::new().with_function(Double);
        match registry.list_functions(Some("test")) {
            Value::List(items) => assert_eq!(items.len(), 1),
            other => panic!("expected list, got {:?}", other),
        }
    }
}
