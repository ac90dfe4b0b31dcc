//! Build script for hwbot-i18n
//!
//! Validates the Fluent locale files at compile time:
//! - every file parses
//! - every message the catalogue formats exists in every locale
//! - all locales define the same keys with the same variables

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use fluent_syntax::ast::{Entry, Expression, InlineExpression, Pattern, PatternElement};
use fluent_syntax::parser::parse;

/// Messages looked up by `src/catalog.rs`.
const REQUIRED_KEYS: &[&str] = &[
    "status-changed",
    "verdict-approved",
    "verdict-reviewing",
    "verdict-rejected",
    "program-failure",
    "reason-unexpected-status",
    "reason-request-failed",
    "reason-not-an-object",
    "reason-homeworks-missing",
    "reason-homeworks-not-a-list",
    "reason-missing-field",
    "reason-unknown-status",
    "reason-internal",
];

type MessageParams = BTreeMap<String, BTreeSet<String>>;

fn extract_messages_and_params(content: &str) -> Result<MessageParams, String> {
    let resource = parse(content).map_err(|(_, errors)| format!("Parse errors: {errors:?}"))?;

    let mut messages = BTreeMap::new();
    for entry in resource.body {
        if let Entry::Message(message) = entry {
            let mut params = BTreeSet::new();
            if let Some(Pattern { elements }) = &message.value {
                extract_params_from_pattern(elements, &mut params);
            }
            for attribute in &message.attributes {
                extract_params_from_pattern(&attribute.value.elements, &mut params);
            }
            messages.insert(message.id.name.to_string(), params);
        }
    }
    Ok(messages)
}

fn extract_params_from_pattern(elements: &[PatternElement<&str>], params: &mut BTreeSet<String>) {
    for element in elements {
        if let PatternElement::Placeable { expression } = element {
            extract_params_from_expression(expression, params);
        }
    }
}

fn extract_params_from_expression(expression: &Expression<&str>, params: &mut BTreeSet<String>) {
    match expression {
        Expression::Select { selector, variants } => {
            extract_params_from_inline(selector, params);
            for variant in variants {
                extract_params_from_pattern(&variant.value.elements, params);
            }
        }
        Expression::Inline(inline) => extract_params_from_inline(inline, params),
    }
}

fn extract_params_from_inline(expression: &InlineExpression<&str>, params: &mut BTreeSet<String>) {
    match expression {
        InlineExpression::VariableReference { id } => {
            params.insert(id.name.to_string());
        }
        InlineExpression::FunctionReference { arguments, .. } => {
            for arg in &arguments.positional {
                extract_params_from_inline(arg, params);
            }
            for arg in &arguments.named {
                extract_params_from_inline(&arg.value, params);
            }
        }
        InlineExpression::Placeable { expression } => extract_params_from_expression(expression, params),
        InlineExpression::MessageReference { .. }
        | InlineExpression::TermReference { .. }
        | InlineExpression::StringLiteral { .. }
        | InlineExpression::NumberLiteral { .. } => {}
    }
}

fn find_locale_files(locales_dir: &Path) -> Result<BTreeMap<String, PathBuf>, String> {
    let mut files = BTreeMap::new();
    let entries = fs::read_dir(locales_dir)
        .map_err(|e| format!("Failed to read {}: {e}", locales_dir.display()))?;

    for entry in entries {
        let path = entry.map_err(|e| format!("Failed to read directory entry: {e}"))?.path();
        let main_ftl = path.join("main.ftl");
        if path.is_dir() && main_ftl.exists() {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| format!("Invalid locale directory name: {}", path.display()))?;
            files.insert(name.to_string(), main_ftl);
        }
    }

    if files.is_empty() {
        return Err(format!("No locale files under {}", locales_dir.display()));
    }
    Ok(files)
}

fn validate_locales() -> Result<(), String> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").map_err(|_| "CARGO_MANIFEST_DIR not set")?;
    let locales_dir = Path::new(&manifest_dir).join("locales");
    println!("cargo:rerun-if-changed={}", locales_dir.display());

    let mut all_messages = BTreeMap::new();
    let mut problems = Vec::new();

    for (locale, path) in find_locale_files(&locales_dir)? {
        println!("cargo:rerun-if-changed={}", path.display());
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        match extract_messages_and_params(&content) {
            Ok(messages) => {
                for key in REQUIRED_KEYS {
                    if !messages.contains_key(*key) {
                        problems.push(format!("{locale}: missing message '{key}'"));
                    }
                }
                all_messages.insert(locale, messages);
            }
            Err(e) => problems.push(format!("{locale}: {e}")),
        }
    }

    let mut locales = all_messages.iter();
    if let Some((reference_locale, reference)) = locales.next() {
        for (locale, messages) in locales {
            for (key, params) in reference {
                match messages.get(key) {
                    None => problems.push(format!("{locale}: missing message '{key}' (present in {reference_locale})")),
                    Some(other) if other != params => problems.push(format!(
                        "{locale}: variables of '{key}' differ from {reference_locale}: {other:?} vs {params:?}"
                    )),
                    Some(_) => {}
                }
            }
            for key in messages.keys().filter(|key| !reference.contains_key(*key)) {
                problems.push(format!("{locale}: extra message '{key}' (absent from {reference_locale})"));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("\n"))
    }
}

fn main() {
    if let Err(e) = validate_locales() {
        eprintln!("Locale validation failed:\n{e}");
        process::exit(1);
    }
}
