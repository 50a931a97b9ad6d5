//! Markdown rendering of analyses and rankings.

use std::fmt::Write;

use crate::models::{FeatureAnalysis, RankedFeature};

const NA: &str = "N/A";

/// Render a full analysis report for one feature.
///
/// Example header:
/// ```text
/// # Fraud scoring (FinTech)
///
/// **Priority score:** 67.2
/// (Reach 8 × Impact 7 × Confidence 6) / Effort 5
/// **Overall confidence:** 7.5 / 10 (high)
/// ```
pub fn render_analysis(feature_name: &str, industry: &str, analysis: &FeatureAnalysis) -> String {
    let mut out = String::new();
    let rice = &analysis.rice_scores;

    let _ = writeln!(out, "# {} ({})\n", feature_name, industry);
    let _ = writeln!(out, "**Priority score:** {:.1}", rice.final_rice_score);
    let _ = writeln!(
        out,
        "(Reach {} × Impact {} × Confidence {}) / Effort {}",
        rice.reach.value, rice.impact.value, rice.confidence.value, rice.effort.value
    );
    if let Some(computed) = rice.computed_score() {
        if (computed - rice.final_rice_score).abs() > 0.05 {
            let _ = writeln!(out, "_Recomputed from components: {:.1}_", computed);
        }
    }
    let _ = writeln!(
        out,
        "**Overall confidence:** {:.1} / 10 ({})\n",
        analysis.confidence(),
        analysis.confidence_level().as_str()
    );

    out.push_str("## RICE Justifications\n\n");
    out.push_str("| Component | Value | Justification |\n|---|---|---|\n");
    for (label, component) in rice.components() {
        let reason = if component.reason.is_empty() {
            "No justification"
        } else {
            component.reason.as_str()
        };
        let _ = writeln!(out, "| {} | {} | {} |", label, component.value, cell(reason));
    }

    out.push_str("\n## MoSCoW Priority\n\n");
    match (&analysis.moscow_priority, analysis.moscow_category()) {
        (Some(priority), Some(category)) => {
            let _ = writeln!(out, "**{}** ({})", priority.category, category.as_str());
            if !priority.justification.is_empty() {
                let _ = writeln!(out, "*Justification*: {}", priority.justification);
            }
        }
        _ => {
            let _ = writeln!(out, "{}", NA);
        }
    }

    out.push_str("\n## Implementation Overview\n\n");
    let implementation = analysis.implementation.as_ref();
    let _ = writeln!(
        out,
        "- **Complexity**: {}\n- **Dependencies**: {}\n- **Timeline**: {}",
        or_na(implementation.map(|i| i.complexity.as_str())),
        or_na(implementation.map(|i| i.dependencies.as_str())),
        or_na(implementation.map(|i| i.timeline.as_str())),
    );

    if let Some(value) = &analysis.business_value {
        out.push_str("\n## Business Value\n\n");
        let _ = writeln!(
            out,
            "- **Revenue Potential**: {}\n- **Cost Savings**: {}\n- **Market Positioning**: {}",
            or_na(Some(value.revenue_potential.as_str())),
            or_na(Some(value.cost_savings.as_str())),
            or_na(Some(value.market_positioning.as_str())),
        );
    }

    out.push_str("\n## Risk Assessment\n\n");
    let risks = &analysis.risks;
    let _ = writeln!(
        out,
        "- **Technical Complexity**: {}\n- **Business Model**: {}\n- **Adoption**: {}\n- **Competition**: {}",
        risks.technical_complexity, risks.business_model, risks.adoption, risks.competition
    );

    out.push_str("\n## MVP Roadmap\n\n");
    let _ = writeln!(
        out,
        "**Recommendation**: {}\n",
        or_na(analysis.mvp_recommendation.as_deref())
    );
    if analysis.roadmap.is_empty() {
        out.push_str("No roadmap data provided.\n");
    } else {
        out.push_str("| Phase | Timeline | Milestone | Success Metric |\n|---|---|---|---|\n");
        for phase in &analysis.roadmap {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                cell(&phase.phase),
                cell(&phase.timeline),
                cell(&phase.milestone),
                cell(&phase.success_metric)
            );
        }
    }

    out.push_str("\n## Industry Insights\n\n");
    let _ = writeln!(
        out,
        "{}",
        or_na(analysis.industry_specific_considerations.as_deref())
    );

    out.push_str("\n## Monetization Strategy\n\n");
    let _ = writeln!(out, "{}", or_na(analysis.recommended_monetization.as_deref()));

    out.push_str("\n## Confidence Improvement Areas\n\n");
    if analysis.confidence_improvement_areas.is_empty() {
        out.push_str("_No specific improvements provided._\n");
    } else {
        for (area, advice) in &analysis.confidence_improvement_areas {
            let _ = writeln!(out, "- **{}**: {}", area, advice);
        }
    }

    out.push_str("\n## SWOT Analysis\n\n");
    let swot = analysis.swot_analysis.as_ref();
    out.push_str("| Strengths | Weaknesses |\n|---|---|\n");
    let _ = writeln!(
        out,
        "| {} | {} |",
        cell(or_na(swot.map(|s| s.strengths.as_str()))),
        cell(or_na(swot.map(|s| s.weaknesses.as_str())))
    );
    out.push_str("\n| Opportunities | Threats |\n|---|---|\n");
    let _ = writeln!(
        out,
        "| {} | {} |",
        cell(or_na(swot.map(|s| s.opportunities.as_str()))),
        cell(or_na(swot.map(|s| s.threats.as_str())))
    );

    if let Some(assumption) = &analysis.assumption_line {
        let _ = writeln!(out, "\n_Assumption: {}_", assumption);
    }

    if !analysis.clarifying_questions.is_empty() {
        out.push_str("\n## Clarifying Questions\n\n");
        for (i, question) in analysis.clarifying_questions.iter().enumerate() {
            let _ = writeln!(out, "{}) {}", i + 1, question);
        }
    }

    out
}

/// Render a RICE ranking as a markdown table.
pub fn render_comparison(ranked: &[RankedFeature]) -> String {
    if ranked.is_empty() {
        return "No analyzed features to compare.\n".to_string();
    }

    let mut out = String::from(
        "| # | Feature | RICE | Reach | Impact | Confidence | Effort |\n|---|---|---|---|---|---|---|\n",
    );
    for (i, row) in ranked.iter().enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {:.1} | {} | {} | {} | {} |",
            i + 1,
            cell(&row.name),
            row.rice_score,
            row.reach,
            row.impact,
            row.confidence,
            row.effort
        );
    }
    out
}

fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NA,
    }
}

/// Keep free text inside a single table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
