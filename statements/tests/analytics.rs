use chrono::NaiveDate;
use statements::analytics::{
    category_stats, income_stats, monthly_advice, monthly_stats, FixedPicker,
};
use statements::{parse_statement, Bank, Category, StatementText, StoredTransaction};

const STATEMENT: &str = "\
ПАО Сбербанк
Выписка по счёту дебетовой карты
05.03.2025 10:00 000001 Кофейня у дома -500,00
10.04.2025 09:00 000002 Пополнение через банкомат +20 000,00
12.04.2025 12:30 000003 Магазин Продукты -3 000,00
15.04.2025 19:00 000004 Кофейня у дома -1 000,00
20.04.2025 11:00 000005 Перевод СБП Иванов И. -5 000,00
";

fn stored_from_statement() -> Vec<StoredTransaction> {
    let parsed = parse_statement(Bank::Sber, &StatementText::from_text(STATEMENT)).unwrap();

    parsed
        .transactions
        .iter()
        .enumerate()
        .map(|(i, tx)| StoredTransaction {
            id: i as i64 + 1,
            date: tx.date.format("%d.%m.%Y").to_string(),
            time: tx.time.map(|t| t.format("%H:%M").to_string()),
            amount: tx.amount,
            description: tx.description.clone(),
            category: tx.category,
            bank: Bank::Sber,
            statement_id: Some(1),
        })
        .collect()
}

fn now() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()
}

#[test]
fn category_stats_over_parsed_statement() {
    let stored = stored_from_statement();
    let stats = category_stats(&stored, now());

    // мартовский кофе старше 30 дней, пополнение — не расход
    assert_eq!(stats.total_spent, 9000.0);
    assert_eq!(stats.period.start.as_deref(), Some("12.04.2025"));
    assert_eq!(stats.period.end.as_deref(), Some("20.04.2025"));

    let sum: f64 = stats.categories.iter().map(|c| c.amount).sum();
    assert!((sum - stats.total_spent).abs() < 0.01);
}

#[test]
fn monthly_stats_cover_both_months_of_the_window() {
    let stored = stored_from_statement();
    let rows = monthly_stats(&stored, now());

    assert!(rows.iter().any(|r| r.month == "Мар" && r.amount == 500.0));
    assert!(
        rows.iter()
            .any(|r| r.month == "Апр" && r.category == Category::Coffee && r.amount == 1000.0)
    );
}

#[test]
fn income_stats_list_only_topups() {
    let stored = stored_from_statement();
    let rows = income_stats(&stored, now());

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, 20000.0);
    assert_eq!(rows[0].category, Category::TopUp);
    assert!(rows[0].description.contains("Пополнение"));
}

#[test]
fn advice_compares_this_month_with_previous() {
    let stored = stored_from_statement();
    let advice = monthly_advice(&stored, now(), &FixedPicker(0));

    // кофе: 500 в марте, 1000 в апреле — рост 100%
    let coffee = advice
        .iter()
        .find(|a| a.category == Category::Coffee)
        .expect("совет по кофейням");
    assert_eq!(coffee.change_percent, 100.0);
    assert!(coffee.advice.contains("Кофейни"));

    // переводы советов не получают
    assert!(advice.iter().all(|a| a.category != Category::Transfers));
}

#[test]
fn analytics_outputs_serialize_to_expected_json_shape() {
    let stored = stored_from_statement();
    let stats = category_stats(&stored, now());

    let value = serde_json::to_value(&stats).unwrap();
    assert_eq!(value["totalSpent"], 9000.0);
    assert_eq!(value["period"]["start"], "12.04.2025");
    assert!(value["categories"].is_array());
    // категории сериализуются русскими метками
    assert!(
        value["categories"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c["category"] == "Кофейни")
    );

    let rows = monthly_stats(&stored, now());
    let value = serde_json::to_value(&rows).unwrap();
    // у сведённых строк описания нет вовсе
    assert!(value[0].get("description").is_none());
}
