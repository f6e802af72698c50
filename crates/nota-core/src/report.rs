//! Plain-text shopping list report.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::models::item::ExtractedItem;
use crate::receipt::rules::format_br_amount;

/// Sum of `unit_price * quantity` over all items, saturating at [`Decimal::MAX`].
pub fn items_total(items: &[ExtractedItem]) -> Decimal {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.subtotal()))
        .unwrap_or(Decimal::MAX)
}

/// Render items as a message-friendly report.
///
/// ```text
/// *Relatorio de Lista de Compras*
/// Data: 17/10/2026 14:30
/// Lista: Mercado
/// Qtd. itens: 1
/// Total: R$ 49,80
///
/// *Itens:*
/// - ARROZ 5KG: 2 x R$ 24,90 = R$ 49,80
/// ```
pub fn format_item_report(title: &str, items: &[ExtractedItem], generated_at: NaiveDateTime) -> String {
    let mut lines = vec![
        "*Relatorio de Lista de Compras*".to_string(),
        format!("Data: {}", generated_at.format("%d/%m/%Y %H:%M")),
        format!("Lista: {}", title),
        format!("Qtd. itens: {}", items.len()),
        format!("Total: {}", format_br_amount(items_total(items))),
        String::new(),
    ];

    if items.is_empty() {
        lines.push("Sem itens na lista.".to_string());
    } else {
        lines.push("*Itens:*".to_string());
        for item in items {
            lines.push(format!(
                "- {}: {} x {} = {}",
                item.description,
                item.quantity,
                format_br_amount(item.unit_price),
                format_br_amount(item.subtotal())
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 12)
            .unwrap()
            .and_hms_opt(14, 33, 0)
            .unwrap()
    }

    fn item(description: &str, quantity: u32, price: &str) -> ExtractedItem {
        ExtractedItem::new(description, quantity, Decimal::from_str(price).unwrap()).unwrap()
    }

    #[test]
    fn test_items_total() {
        let items = vec![item("ARROZ", 2, "24.90"), item("FEIJAO", 1, "8.50")];
        assert_eq!(items_total(&items), Decimal::from_str("58.30").unwrap());
        assert_eq!(items_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_items_total_saturates() {
        let huge = ExtractedItem::new("ITEM CARO", 1, Decimal::MAX).unwrap();
        let items = vec![huge.clone(), huge];

        assert_eq!(items_total(&items), Decimal::MAX);
    }

    #[test]
    fn test_format_item_report() {
        let items = vec![item("ARROZ TIO JOAO 5KG", 2, "24.90"), item("FEIJAO PRETO 1KG", 1, "8.50")];
        let report = format_item_report("Mercado", &items, at());

        assert_eq!(
            report,
            "*Relatorio de Lista de Compras*\n\
             Data: 12/05/2024 14:33\n\
             Lista: Mercado\n\
             Qtd. itens: 2\n\
             Total: R$ 58,30\n\
             \n\
             *Itens:*\n\
             - ARROZ TIO JOAO 5KG: 2 x R$ 24,90 = R$ 49,80\n\
             - FEIJAO PRETO 1KG: 1 x R$ 8,50 = R$ 8,50"
        );
    }

    #[test]
    fn test_format_empty_report() {
        let report = format_item_report("Vazia", &[], at());
        assert!(report.contains("Total: R$ 0,00"));
        assert!(report.ends_with("Sem itens na lista."));
    }
}
