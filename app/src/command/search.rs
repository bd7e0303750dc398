use cardex_core::ResultSummary;

use super::{init_common_components, load_index, pack_location};

/// Input parameters for the Search command strategy.
#[derive(Debug, Clone)]
pub struct SearchInput {
    pub query: String,
    /// Falls back to `search.default_limit`
    pub limit: Option<usize>,
    /// Also true when `search.include_text` is set
    pub include_text: bool,
    pub pack: Option<String>,
}

/// Strategy for a one-shot ranked search against a freshly loaded pack.
#[derive(Debug, Clone, Copy)]
pub struct SearchStrategy;

impl super::CommandStrategy for SearchStrategy {
    type Input = SearchInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components()?;
        let location = pack_location(input.pack, &common.config);
        let index = load_index(&common, &location).await?;

        let limit = input.limit.unwrap_or(common.config.search.default_limit);
        let include_text = input.include_text || common.config.search.include_text;
        let results = index.search(&input.query, limit, include_text);

        if results.is_empty() {
            println!("No cards match \"{}\"", input.query.trim());
            return Ok(());
        }
        for result in &results {
            println!("{}", format_row(result));
        }
        Ok(())
    }
}

fn format_row(result: &ResultSummary) -> String {
    let classification: Vec<&str> = [&result.card_type, &result.extra, &result.attribute]
        .into_iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();

    let mut row = format!("{:>10}  {}", result.id.get(), result.name);
    if !classification.is_empty() {
        row.push_str(&format!("  [{}]", classification.join(" / ")));
    }
    if result.hit == cardex_core::HitKind::Text {
        row.push_str("  (text)");
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardex_core::{HitKind, normalize};
    use serde_json::json;

    fn summary(raw: &serde_json::Value, hit: HitKind) -> ResultSummary {
        let Some(card) = normalize(raw) else {
            panic!("expected {raw} to normalize");
        };
        card.summary(hit)
    }

    #[test]
    fn row_lists_non_empty_classification() {
        let row = format_row(&summary(
            &json!({ "id": 46986414, "Name": "Dark Magician", "Type": "Normal Monster", "Attribute": "DARK" }),
            HitKind::Name,
        ));
        assert_eq!(row, "  46986414  Dark Magician  [Normal Monster / DARK]");
    }

    #[test]
    fn text_hits_are_marked() {
        let row = format_row(&summary(&json!({ "id": 1, "Name": "Kuriboh" }), HitKind::Text));
        assert_eq!(row, "         1  Kuriboh  (text)");
    }
}
