/// Текст выписки, извлечённый из документа постранично.
///
/// Декодирование самого документа (PDF и т.п.) — забота вызывающей стороны;
/// ядру нужен только текст в порядке страниц. Пустой документ — корректный
/// вход: все методы вернут пустые результаты.
#[derive(Debug, Clone, Default)]
pub struct StatementText {
    pages: Vec<String>,
}

impl StatementText {
    pub fn from_pages(pages: Vec<String>) -> Self {
        StatementText { pages }
    }

    /// Весь текст как одна страница (если постраничной разбивки нет)
    pub fn from_text(text: &str) -> Self {
        StatementText {
            pages: vec![text.to_string()],
        }
    }

    /// Непустые строки без краевых пробелов, в порядке страниц
    pub fn lines(&self) -> Vec<&str> {
        self.pages
            .iter()
            .flat_map(|page| page.lines())
            .map(str::trim)
            .filter(|ln| !ln.is_empty())
            .collect()
    }

    /// Сырой текст целиком; пустые строки сохранены — по нему ищутся
    /// заголовочные метки вроде периода выписки
    pub fn full_text(&self) -> String {
        self.pages.join("\n")
    }

    /// Текст первой страницы — по нему проверяется подпись банка,
    /// чтобы не ловить ложные совпадения в футерах дальних страниц
    pub fn first_page(&self) -> &str {
        self.pages.first().map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.trim().is_empty())
    }
}
