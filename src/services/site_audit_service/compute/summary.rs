use crate::models::{
    Audit, AuditCategory, AuditPass, CategoryIssues, DeviceProfile, Impact, Issue,
    IssuesByCategory, LighthouseReport, OverallHealth, Scores, SummaryRecord,
};
use std::collections::HashSet;

/// Audits scoring at or above this fraction are not reported as issues.
const ISSUE_THRESHOLD: f64 = 0.9;
const TOP_ISSUE_COUNT: usize = 3;

/// Folds the primary (performance) and secondary reports of one job into the
/// payload posted to its webhook. Either report may be missing.
pub fn summarize(
    primary: Option<&LighthouseReport>,
    secondary: Option<&LighthouseReport>,
    device_profile: DeviceProfile,
    target_url: &str,
) -> SummaryRecord {
    let owning = |category: AuditCategory| match category.pass() {
        AuditPass::Primary => primary,
        AuditPass::Secondary => secondary,
    };
    let score = |category| category_score(owning(category), category);
    let issues = |category| category_issues(owning(category), category);

    let scores = Scores {
        performance: score(AuditCategory::Performance),
        accessibility: score(AuditCategory::Accessibility),
        best_practices: score(AuditCategory::BestPractices),
        seo: score(AuditCategory::Seo),
    };

    let issues_by_category = IssuesByCategory {
        performance: issues(AuditCategory::Performance),
        accessibility: issues(AuditCategory::Accessibility),
        best_practices: issues(AuditCategory::BestPractices),
        seo: issues(AuditCategory::Seo),
    };

    let reports: Vec<&LighthouseReport> = [primary, secondary].into_iter().flatten().collect();

    SummaryRecord {
        device_profile,
        target_url: target_url.to_string(),
        overall_health: OverallHealth::from_performance(scores.performance),
        scores,
        issues_by_category,
        top_issues: combined_top_issues(&reports, TOP_ISSUE_COUNT),
    }
}

/// Whole-percent score of a category, or `None` when the report or the
/// category is missing. A category present with a null score counts as 0.
pub fn category_score(report: Option<&LighthouseReport>, category: AuditCategory) -> Option<u8> {
    report?
        .category(category)
        .map(|section| to_percent(section.score.unwrap_or(0.0)))
}

/// Weighted audits of one category that scored below the threshold, worst first.
pub fn category_issues(report: Option<&LighthouseReport>, category: AuditCategory) -> CategoryIssues {
    let Some((report, section)) =
        report.and_then(|r| r.category(category).map(|section| (r, section)))
    else {
        return CategoryIssues::Skipped;
    };

    let mut issues: Vec<Issue> = section
        .audit_refs
        .iter()
        .filter(|audit_ref| audit_ref.weight > 0.0)
        .filter_map(|audit_ref| report.audits.get(&audit_ref.id))
        .filter(|audit| is_deficient(audit))
        .map(to_issue)
        .collect();

    // stable: ties keep the category's audit order
    issues.sort_by_key(|issue| issue.score);
    CategoryIssues::Found(issues)
}

/// Worst `count` issues across every category of every report, one per title.
/// Unlike the per-category lists, unweighted audits take part here.
pub fn combined_top_issues(reports: &[&LighthouseReport], count: usize) -> Vec<Issue> {
    let mut seen_titles = HashSet::new();
    let mut pooled = Vec::new();

    for report in reports {
        for section in report.categories.values() {
            for audit_ref in &section.audit_refs {
                let Some(audit) = report.audits.get(&audit_ref.id) else {
                    continue;
                };
                if !is_deficient(audit) {
                    continue;
                }
                let issue = to_issue(audit);
                if seen_titles.insert(issue.metric.clone()) {
                    pooled.push(issue);
                }
            }
        }
    }

    pooled.sort_by_key(|issue| issue.score);
    pooled.truncate(count);
    pooled
}

fn is_deficient(audit: &Audit) -> bool {
    matches!(audit.score, Some(score) if score < ISSUE_THRESHOLD)
}

fn to_issue(audit: &Audit) -> Issue {
    Issue {
        metric: audit.title.clone().unwrap_or_else(|| "N/A".to_string()),
        description: audit
            .description
            .clone()
            .unwrap_or_else(|| "N/A".to_string()),
        score: to_percent(audit.score.unwrap_or(0.0)),
        impact: Impact::from_score(audit.score),
        display_value: audit
            .display_value
            .clone()
            .unwrap_or_else(|| "n/a".to_string()),
    }
}

fn to_percent(fraction: f64) -> u8 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}
