//! Layer validation against a rule set
//!
//! Validation runs in two passes: the sub-occupancy allow-set is derived
//! from the document's base-category layers first, then every layer is
//! matched and checked. Nothing here fails; problems become verdict reasons
//! or document findings.

use std::collections::BTreeSet;

use super::color::resolve;
use super::derive::{derive_occupancy_colors, OccupancyColors};
use super::pattern::{compile, CompiledPattern};
use super::text::check_text;
use super::units::check_units;
use super::verdict::{FixAction, Finding, ValidationReport, ValidationVerdict, VerdictStatus};
use crate::config::ValidationConfig;
use crate::model::{Color, Document, Entity, Layer, LayerRule, RuleEntityType, RuleSet};
use crate::snapshot::geometry::entity_area;
use crate::{log_op_end, log_op_start};

const UNRECOGNIZED_LAYER: &str = "Layer not found in master guidelines";
const OPEN_POLYGON: &str = "Open Polygon detected. Area cannot be calculated.";

/// Validate with the default configuration
pub fn validate(document: &Document, rules: &RuleSet) -> ValidationReport {
    validate_with_config(document, rules, &ValidationConfig::default())
}

pub fn validate_with_config(document: &Document, rules: &RuleSet, config: &ValidationConfig) -> ValidationReport {
    log_op_start!(
        "validate",
        layer_count = document.layers.len(),
        rule_count = rules.len()
    );
    let start = std::time::Instant::now();

    let patterns: Vec<CompiledPattern> = rules.iter().map(|r| compile(&r.name_template)).collect();
    let base = compile(&config.base_category_template);
    let occupancy = derive_occupancy_colors(document, &base);

    let mut report = ValidationReport {
        unit_checks: check_units(&document.units, &config.units),
        ..ValidationReport::default()
    };

    report.findings.extend(rule_set_findings(document, rules, config, &occupancy));

    for (rule, pattern) in rules.iter().zip(&patterns) {
        if !rule.mandatory || document.layers.iter().any(|l| pattern.is_match(&l.name)) {
            continue;
        }
        report.findings.push(Finding::error(format!(
            "Missing Mandatory Layer: {} (Feature: {})",
            rule.name_template,
            rule.feature.as_deref().unwrap_or("Unknown")
        )));
        if let Some(color) = rule.color.fix_color() {
            report.fix_actions.push(FixAction::CreateLayer {
                layer: rule.name_template.clone(),
                color,
            });
        }
    }

    for layer in &document.layers {
        if config.is_ignored(&layer.name) {
            tracing::debug!(layer_name = %layer.name, "ignored layer skipped");
            continue;
        }
        let matched: Vec<usize> = patterns
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_match(&layer.name))
            .map(|(i, _)| i)
            .collect();

        let Some(&first) = matched.first() else {
            report.layer_verdicts.push(ValidationVerdict {
                layer_name: layer.name.clone(),
                status: VerdictStatus::Warning,
                reasons: vec![UNRECOGNIZED_LAYER.to_string()],
                matched_rule: None,
                measured_area: None,
                text_values: Vec::new(),
            });
            continue;
        };

        let entities: Vec<&Entity> = document.entities_on(&layer.name).collect();
        let rule = &rules.rules()[first];
        let mut outcome = check_layer(layer, rule, &entities, &occupancy, config.max_reasons_per_check);

        if matched.len() > 1 {
            let templates: Vec<&str> = matched
                .iter()
                .map(|&i| rules.rules()[i].name_template.as_str())
                .collect();
            outcome.verdict.reasons.push(format!(
                "Layer matches {} rule templates ({}); applied first: {}",
                matched.len(),
                templates.join(", "),
                rule.name_template
            ));
            if outcome.verdict.status == VerdictStatus::Valid {
                outcome.verdict.status = VerdictStatus::Warning;
            }
        }

        if let Some(action) = outcome.fix {
            report.fix_actions.push(action);
        }
        report.layer_verdicts.push(outcome.verdict);
    }

    report.occupancy_colors = occupancy;

    let invalid_count = report
        .layer_verdicts
        .iter()
        .filter(|v| v.status == VerdictStatus::Invalid)
        .count();
    log_op_end!(
        "validate",
        duration_ms = start.elapsed().as_millis() as u64,
        invalid_count = invalid_count,
        finding_count = report.findings.len()
    );
    report
}

/// Document warnings about the rule set itself
fn rule_set_findings(
    document: &Document,
    rules: &RuleSet,
    config: &ValidationConfig,
    occupancy: &OccupancyColors,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for template in rules.duplicate_templates() {
        findings.push(Finding::warning(format!(
            "Rule template {} appears more than once; the first occurrence is applied",
            template
        )));
    }

    if rules.has_derived_color_rules() {
        let base = &config.base_category_template;
        if !rules.has_template(base) {
            findings.push(Finding::warning(format!(
                "Rule set uses sub-occupancy colors but has no rule for base template {}",
                base
            )));
        }
        if occupancy.is_empty() {
            findings.push(Finding::warning(format!(
                "No {} layers present; sub-occupancy colors cannot be derived",
                base
            )));
        }
    }

    let orphaned: BTreeSet<&str> = document
        .entities
        .iter()
        .map(|e| e.layer.as_str())
        .filter(|name| document.layer(name).is_none())
        .collect();
    for name in orphaned {
        findings.push(Finding::warning(format!(
            "Entities reference layer '{}' which the document does not define",
            name
        )));
    }

    findings
}

struct LayerOutcome {
    verdict: ValidationVerdict,
    fix: Option<FixAction>,
}

/// Sorted, deduplicated, capped
fn condense(messages: Vec<String>, cap: usize) -> Vec<String> {
    messages.into_iter().collect::<BTreeSet<_>>().into_iter().take(cap).collect()
}

fn check_layer(
    layer: &Layer,
    rule: &LayerRule,
    entities: &[&Entity],
    occupancy: &OccupancyColors,
    cap: usize,
) -> LayerOutcome {
    let mut reasons = Vec::new();
    let mut failed = false;
    let mut fix = None;

    // Color
    let entity_colors: Vec<Color> = entities.iter().map(|e| e.color).collect();
    let color = resolve(&rule.color, &layer.color, &entity_colors, occupancy);
    if !color.valid {
        failed = true;
        fix = rule.color.fix_color().map(|fix_color| FixAction::FixColor {
            layer: layer.name.clone(),
            color: fix_color,
        });
    }
    if let Some(reason) = color.reason {
        reasons.push(reason);
    }

    // Entity type
    if let Some(entity_type) = rule.entity_type {
        let type_errors: Vec<String> = entities
            .iter()
            .filter(|e| !entity_type.allows(e.kind))
            .map(|e| {
                format!(
                    "Invalid Entity: Found '{}' on layer requiring '{}'",
                    e.kind,
                    entity_type.as_str()
                )
            })
            .collect();
        if !type_errors.is_empty() {
            failed = true;
            reasons.extend(condense(type_errors, cap));
        }
    }

    // Geometry
    let mut closed_area = 0.0;
    if rule.geometry.is_some_and(|g| g.must_be_closed) {
        let polygonal = entities.iter().filter(|e| e.kind.is_polyline() || e.kind.is_region());
        let mut open = false;
        for entity in polygonal {
            if entity.is_closed_shape() {
                closed_area += entity_area(entity).unwrap_or(0.0);
            } else {
                open = true;
            }
        }
        if open {
            failed = true;
            reasons.push(OPEN_POLYGON.to_string());
        }
    }

    // Text
    let mut text_values = Vec::new();
    if rule.entity_type == Some(RuleEntityType::Text) {
        let texts: Vec<&str> = entities
            .iter()
            .filter(|e| e.kind.is_text())
            .map(|e| e.text.as_deref().unwrap_or(""))
            .collect();

        if let Some(format) = rule.text.and_then(|t| t.format) {
            let text_errors: Vec<String> = texts
                .iter()
                .filter_map(|t| {
                    check_text(format, t)
                        .err()
                        .map(|hint| format!("Invalid Text: '{}' ({})", t, hint))
                })
                .collect();
            if !text_errors.is_empty() {
                failed = true;
                reasons.extend(condense(text_errors, cap));
            }
        }

        text_values = texts
            .iter()
            .map(|t| t.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if rule.text.is_some_and(|t| t.single_value) && text_values.len() > 1 {
            failed = true;
            reasons.push(format!(
                "Multiple values found for Voltage: {}. Expected single unique value.",
                text_values.join(", ")
            ));
        }
    }

    let measured_area = (!failed && rule.entity_type == Some(RuleEntityType::Polygon)).then_some(closed_area);

    LayerOutcome {
        verdict: ValidationVerdict {
            layer_name: layer.name.clone(),
            status: if failed {
                VerdictStatus::Invalid
            } else {
                VerdictStatus::Valid
            },
            reasons,
            matched_rule: Some(rule.name_template.clone()),
            measured_area,
            text_values,
        },
        fix,
    }
}
