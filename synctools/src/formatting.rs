use prettytable::{
    format::{LinePosition, LineSeparator, TableFormat},
    row,
    Table,
};
use sync_engine::{PolicyTable, ProductSnapshot, SyncIntent, SyncPlan, SyncReport};

fn markdown_format() -> TableFormat {
    prettytable::format::FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separator(LinePosition::Title, LineSeparator::new('-', '|', '|', '|'))
        .padding(1, 1)
        .build()
}

fn markdown_style(table: &mut Table) {
    table.set_format(markdown_format());
}

fn optional<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

fn snapshot_line(snapshot: &ProductSnapshot) -> String {
    format!(
        "{} #{}: stock={} price={} status={} updated={}",
        snapshot.system,
        snapshot.remote_id,
        optional(&snapshot.stock),
        optional(&snapshot.price),
        optional(&snapshot.status),
        optional(&snapshot.updated_at.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())),
    )
}

pub fn format_intents(intents: &[SyncIntent]) -> String {
    let mut table = Table::new();
    table.set_titles(row!["Target", "ID", "Field", "Old", "New", "Write"]);
    intents.iter().for_each(|intent| {
        table.add_row(row![
            intent.target,
            intent.target_id,
            intent.field,
            intent.old_value,
            intent.new_value,
            intent.mechanism
        ]);
    });
    markdown_style(&mut table);
    table.to_string()
}

pub fn format_plan(plan: &SyncPlan) -> String {
    let mut s = format!(
        "SKU {} ({})\n  {}\n  {}\n",
        plan.sku(),
        plan.direction,
        snapshot_line(&plan.back_office),
        snapshot_line(&plan.website)
    );
    if plan.is_empty() {
        s.push_str("Nothing to change");
    } else {
        s.push_str(&format_intents(&plan.intents));
    }
    s
}

pub fn format_report(report: &SyncReport) -> String {
    let mut s = format!("SKU {}: {} applied, {} failed", report.sku, report.applied.len(), report.failed.len());
    if !report.failed.is_empty() {
        let mut table = Table::new();
        table.set_titles(row!["Target", "Field", "Write", "Error"]);
        report.failed.iter().for_each(|f| {
            table.add_row(row![f.intent.target, f.intent.field, f.intent.mechanism, f.error]);
        });
        markdown_style(&mut table);
        s.push('\n');
        s.push_str(&table.to_string());
    }
    s
}

pub fn format_policy_table(policy: &PolicyTable) -> String {
    let mut table = Table::new();
    table.set_titles(row!["Field", "Direction", "Overwrite"]);
    policy.rows().iter().for_each(|p| {
        table.add_row(row![p.field, p.direction, if p.overwrite { "yes" } else { "never" }]);
    });
    markdown_style(&mut table);
    table.to_string()
}
