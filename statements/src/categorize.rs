use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Bank, Category};

/// Упорядоченная таблица правил «категория -> набор регулярок».
///
/// Побеждает первая категория, у которой совпал хотя бы один паттерн;
/// порядок объявления таблицы разрешает конфликты.
struct RegexRules {
    rules: Vec<(Category, Vec<Regex>)>,
}

impl RegexRules {
    fn compile(table: &[(Category, &[&str])]) -> Self {
        let rules = table
            .iter()
            .map(|(cat, patterns)| {
                let compiled = patterns
                    .iter()
                    .map(|p| {
                        Regex::new(&format!("(?i){p}"))
                            .unwrap_or_else(|e| panic!("bad category pattern '{p}': {e}"))
                    })
                    .collect();
                (*cat, compiled)
            })
            .collect();
        RegexRules { rules }
    }

    fn categorize(&self, description: &str) -> Category {
        for (cat, patterns) in &self.rules {
            if patterns.iter().any(|p| p.is_match(description)) {
                return *cat;
            }
        }
        Category::Other
    }
}

/// Упорядоченная таблица «ключевое слово -> категория».
///
/// Ключи в нижнем регистре; побеждает первое слово, найденное в описании.
struct KeywordRules {
    rules: Vec<(&'static str, Category)>,
}

impl KeywordRules {
    fn categorize(&self, description: &str) -> Category {
        let lowered = description.to_lowercase();
        for (keyword, cat) in &self.rules {
            if lowered.contains(keyword) {
                return *cat;
            }
        }
        Category::Other
    }
}

/// Таблица правил Т-Банка: варианты брендов кириллицей и латиницей,
/// включая частые опечатки и транслит
static TBANK_RULES: Lazy<RegexRules> = Lazy::new(|| {
    RegexRules::compile(&[
        (
            Category::Coffee,
            &[
                r"кофе",
                r"кофейня",
                r"кофешоп",
                r"cafe",
                r"coffee",
                r"шоколадница",
                r"кофемания",
                r"coffeemania",
                r"даблби",
                r"DBL",
                r"DoubleB",
                r"скуратов",
                r"skuratov",
                r"энитайм",
                r"entime",
                r"starbucks",
                r"старбакс",
            ],
        ),
        (
            Category::Stores,
            &[
                r"krasnoe",
                r"красное",
                r"beloye",
                r"белое",
                r"magnit",
                r"магнит",
                r"победа",
                r"pobeda",
                r"plaza",
                r"fixprice",
                r"фикс прайс",
                r"triumf",
                r"триумф",
                r"bufet",
                r"буфет",
                r"пекарушка",
                r"prostor",
                r"простор",
                r"ozon",
                r"wildberries",
                r"валдберрис",
                r"avito",
                r"пят(ё|е)рочка",
                r"ашан",
                r"дикси",
                r"лента",
                r"okey",
                r"окей",
                r"\bip\b",
                r"ярче!?",
                r"yarche",
                r"globus",
                r"мария[\s\-]?ра",
                r"maria[\s\-]?ra",
                r"монетка",
                r"monetka",
                r"командор",
                r"komandor",
                r"холидей",
                r"holiday",
                r"батон",
                r"baton",
                r"аникс",
                r"aniks",
                r"слата",
                r"slata",
                r"ярмарка",
                r"континент",
                r"kontinent",
                r"пч[её]лка",
                r"pchelk",
                r"dns[-\s]?shop",
                r"\bdns\b",
                r"citilink",
                r"ситилинк",
                r"leroy[\s\-]?merlin",
                r"леруа",
                r"\bobi\b",
                r"оби",
                r"sport",
            ],
        ),
        (
            Category::Transport,
            &[r"metro", r"омка", r"omka", r"transport"],
        ),
        (
            Category::Delivery,
            &[
                r"yandex",
                r"яндекс",
                r"eda",
                r"еда",
                r"samokat",
                r"самокат",
                r"delivery",
                r"доставк[ае]",
                r"uber",
                r"ubereats",
                r"food",
                r"деливери",
            ],
        ),
        (
            Category::Entertainment,
            &[r"ivi", r"okko", r"kinopoisk", r"netflix", r"кинопоиск"],
        ),
        (
            Category::TopUp,
            &[r"пополнение", r"внесение наличных", r"cashback", r"кэшбэк"],
        ),
        (
            Category::Utilities,
            &[r"zhku", r"жкх", r"kvartplata", r"квартплата", r"коммунал"],
        ),
        (Category::Transfers, &[r"перевод"]),
    ])
});

/// Таблица правил Сбера: подстроки в нижнем регистре.
/// Более специфичные ключи стоят раньше общих.
static SBER_RULES: Lazy<KeywordRules> = Lazy::new(|| KeywordRules {
    rules: vec![
        ("кофейня", Category::Coffee),
        ("кофе", Category::Coffee),
        ("coffee", Category::Coffee),
        ("шоколадница", Category::Coffee),
        ("старбакс", Category::Coffee),
        ("магнит", Category::Stores),
        ("пятёрочка", Category::Stores),
        ("пятерочка", Category::Stores),
        ("лента", Category::Stores),
        ("ашан", Category::Stores),
        ("дикси", Category::Stores),
        ("ozon", Category::Stores),
        ("wildberries", Category::Stores),
        ("фикс прайс", Category::Stores),
        ("супермаркет", Category::Stores),
        ("магазин", Category::Stores),
        ("продукты", Category::Stores),
        ("метро", Category::Transport),
        ("metro", Category::Transport),
        ("транспорт", Category::Transport),
        ("автобус", Category::Transport),
        ("проезд", Category::Transport),
        ("яндекс еда", Category::Delivery),
        ("самокат", Category::Delivery),
        ("доставка", Category::Delivery),
        ("delivery", Category::Delivery),
        ("кинопоиск", Category::Entertainment),
        ("ivi", Category::Entertainment),
        ("okko", Category::Entertainment),
        ("netflix", Category::Entertainment),
        ("кино", Category::Entertainment),
        ("пополнение", Category::TopUp),
        ("внесение наличных", Category::TopUp),
        ("зачисление", Category::TopUp),
        ("кэшбэк", Category::TopUp),
        ("cashback", Category::TopUp),
        ("жкх", Category::Utilities),
        ("квартплата", Category::Utilities),
        ("коммунал", Category::Utilities),
        ("электроэнергия", Category::Utilities),
        ("перевод", Category::Transfers),
        ("сбп", Category::Transfers),
    ],
});

/// Назначает описанию операции ровно одну категорию по таблице банка.
///
/// Детерминирована и идемпотентна; несовпавшее описание получает «Другие».
pub fn categorize(bank: Bank, description: &str) -> Category {
    match bank {
        Bank::Tbank => TBANK_RULES.categorize(description),
        Bank::Sber => SBER_RULES.categorize(description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tbank_matches_cyrillic_and_latin_brands() {
        assert_eq!(categorize(Bank::Tbank, "ШОКОЛАДНИЦА Москва"), Category::Coffee);
        assert_eq!(categorize(Bank::Tbank, "MAGNIT MM SEVERNY"), Category::Stores);
        assert_eq!(categorize(Bank::Tbank, "Kinopoisk.ru"), Category::Entertainment);
        assert_eq!(
            categorize(Bank::Tbank, "Внесение наличных через банкомат"),
            Category::TopUp
        );
        assert_eq!(
            categorize(Bank::Tbank, "Перевод по номеру телефона"),
            Category::Transfers
        );
    }

    #[test]
    fn tbank_unmatched_description_falls_back_to_other() {
        assert_eq!(categorize(Bank::Tbank, "Оплата услуг нотариуса"), Category::Other);
    }

    #[test]
    fn first_declared_category_wins_on_conflict() {
        // «Победа» содержит «еда»: Магазины объявлены раньше Доставки
        assert_eq!(categorize(Bank::Tbank, "Победа"), Category::Stores);
        // описание задевает и кофейни, и магазины — побеждает более ранняя
        assert_eq!(categorize(Bank::Tbank, "кофе в магните"), Category::Coffee);
    }

    #[test]
    fn categorization_is_idempotent() {
        let desc = "Яндекс Еда";
        let first = categorize(Bank::Tbank, desc);
        assert_eq!(first, categorize(Bank::Tbank, desc));
        assert_eq!(first, Category::Delivery);
    }

    #[test]
    fn sber_keyword_table_matches_lowercased_description() {
        assert_eq!(categorize(Bank::Sber, "МАГАЗИН ПРОДУКТЫ"), Category::Stores);
        assert_eq!(categorize(Bank::Sber, "Перевод СБП Иванов И."), Category::Transfers);
        assert_eq!(categorize(Bank::Sber, "Пополнение счёта"), Category::TopUp);
        assert_eq!(categorize(Bank::Sber, "Оплата ЖКХ март"), Category::Utilities);
    }

    #[test]
    fn sber_unmatched_description_falls_back_to_other() {
        assert_eq!(categorize(Bank::Sber, "Аптека 36.6"), Category::Other);
    }
}
