use anyhow::Context;
use cardex_core::{Card, CardId};
use std::fmt::Write;

use super::{init_common_components, load_index, pack_location};

/// Input parameters for the Show command strategy.
#[derive(Debug, Clone)]
pub struct ShowInput {
    pub id: u64,
    /// Re-fetch from upstream and patch the index before showing
    pub refresh: bool,
    pub pack: Option<String>,
}

/// Strategy for printing the full detail of one card.
#[derive(Debug, Clone, Copy)]
pub struct ShowStrategy;

impl super::CommandStrategy for ShowStrategy {
    type Input = ShowInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let id = CardId::new(input.id).context("Card id must be a positive integer")?;
        let common = init_common_components()?;
        let location = pack_location(input.pack, &common.config);
        let mut index = load_index(&common, &location).await?;

        if input.refresh {
            let normalizer = common.source.normalizer();
            let refreshed = cardex_core::refresh(&common.source, &mut index, normalizer, id)
                .await
                .with_context(|| format!("Failed to refresh card {id}"))?;
            if refreshed.is_none() {
                println!("No data found for card {id}");
                return Ok(());
            }
        }

        let Some(card) = index.get(id) else {
            anyhow::bail!("Card {id} is not in the pack");
        };
        print!("{}", render(card));
        Ok(())
    }
}

fn render(card: &Card) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", card.name(), card.id());

    let classification: Vec<&str> = [card.card_type(), card.extra(), card.attribute()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !classification.is_empty() {
        let _ = writeln!(out, "{}", classification.join(" / "));
    }

    let stats: Vec<String> = [("Level", card.level()), ("ATK", card.atk()), ("DEF", card.def())]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| format!("{label} {v}")))
        .collect();
    if !stats.is_empty() {
        let _ = writeln!(out, "{}", stats.join("  "));
    }

    for (heading, body) in [
        ("Text", card.text()),
        ("PSCT", card.psct_edison()),
        ("Rulings", card.rulings_edison()),
    ] {
        if !body.is_empty() {
            let _ = writeln!(out, "\n{heading}:\n{body}");
        }
    }

    let _ = writeln!(out, "\nSource: {}", card.raw_url());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardex_core::normalize;
    use serde_json::json;

    #[test]
    fn render_skips_empty_sections() {
        let Some(card) = normalize(&json!({
            "id": 89631139,
            "Name": "Blue-Eyes White Dragon",
            "Type": "Normal Monster",
            "Atk": 3000,
            "Def": 2500,
            "Level": 8,
            "Rulings": { "Edison": "Can be Special Summoned." }
        })) else {
            panic!("card should normalize");
        };

        let text = render(&card);
        assert!(text.starts_with("Blue-Eyes White Dragon (89631139)\nNormal Monster\n"));
        assert!(text.contains("Level 8  ATK 3000  DEF 2500"));
        assert!(text.contains("Rulings:\nCan be Special Summoned."));
        assert!(!text.contains("PSCT:"));
        assert!(!text.contains("Text:"));
        assert!(text.ends_with("89631139.json\n"));
    }

    #[test]
    fn zero_stats_are_shown() {
        let Some(card) = normalize(&json!({ "id": 1, "Name": "Kuriboh", "Atk": 300, "Def": 0 })) else {
            panic!("card should normalize");
        };
        assert!(render(&card).contains("ATK 300  DEF 0"));
    }
}
