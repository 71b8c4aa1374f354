use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::artifact::ArtifactDocument;
use crate::models::CanonicalEntity;
use crate::normalizer::NormalizeStats;

/// Render a colored terminal summary of the run.
pub fn render(
    doc: &ArtifactDocument,
    stats: &NormalizeStats,
    artifact: &Path,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let total = doc.meta.total_cities;

    if quiet {
        println!(
            "Cities: {}  Rejected: {}  Defaulted fields: {}  → {}",
            total.to_string().green(),
            stats.rows_rejected.to_string().yellow(),
            stats.total_defaulted(),
            artifact.display(),
        );
        return Ok(());
    }

    println!("\n {} v{}", "crime-rank".bold(), env!("CARGO_PKG_VERSION"));
    println!(" Wrote: {}\n", artifact.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Generated          : {}", doc.meta.generated_at));
    println!(" │  {:<48} │", format!("Rows read          : {:>6}", stats.rows_seen));
    println!(
        " │  {:<48} │",
        format!("{}  Cities ranked   : {:>6}", "✓".green(), total)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Rows rejected   : {:>6}", "✗".red(), stats.rows_rejected)
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Duplicate keys  : {:>6}",
            "⚠".yellow(),
            stats.duplicates_replaced
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Fields defaulted: {:>6}",
            "⚠".yellow(),
            stats.total_defaulted()
        )
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    let by_key: HashMap<&str, &CanonicalEntity> =
        doc.entities.iter().map(|e| (e.key.as_str(), e)).collect();

    if verbose {
        println!(" {} Full ranking:\n", "[RANK]".cyan().bold());
        let all: Vec<&CanonicalEntity> = doc.entities.iter().collect();
        render_table(&all);
        println!();
        return Ok(());
    }

    println!(" {} Most at risk:\n", "[RISK]".red().bold());
    render_table(&lookup(&by_key, &doc.meta.top_most_at_risk));
    println!();

    println!(" {} Safest:\n", "[SAFE]".green().bold());
    render_table(&lookup(&by_key, &doc.meta.top_safest));
    println!();

    Ok(())
}

fn lookup<'a>(
    by_key: &HashMap<&str, &'a CanonicalEntity>,
    keys: &[String],
) -> Vec<&'a CanonicalEntity> {
    keys.iter()
        .filter_map(|k| by_key.get(k.as_str()).copied())
        .collect()
}

fn render_table(entities: &[&CanonicalEntity]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Rank").add_attribute(Attribute::Bold),
            Cell::new("City").add_attribute(Attribute::Bold),
            Cell::new("Violent").add_attribute(Attribute::Bold),
            Cell::new("Property").add_attribute(Attribute::Bold),
            Cell::new("Trend").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
        ]);

    for entity in entities {
        let score = entity.risk_score.unwrap_or(0.0);
        let risk_color = match score {
            s if s >= 0.66 => Color::Red,
            s if s >= 0.33 => Color::Yellow,
            _ => Color::Green,
        };
        let rank = match (entity.rank, entity.rank_out_of) {
            (Some(r), Some(n)) => format!("{}/{}", r, n),
            _ => "-".to_string(),
        };

        table.add_row(vec![
            Cell::new(rank).set_alignment(CellAlignment::Right),
            Cell::new(&entity.key),
            Cell::new(entity.violent_crime).set_alignment(CellAlignment::Right),
            Cell::new(entity.property_crime).set_alignment(CellAlignment::Right),
            Cell::new(&entity.trend),
            Cell::new(format!("{:.4}", score))
                .fg(risk_color)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
}
