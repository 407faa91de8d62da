//! Default line items used to pre-populate a fresh month.

/// Fixed set of expense lines (icon, name) and income names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    pub expenses: Vec<(&'static str, &'static str)>,
    pub income: Vec<&'static str>,
}

impl Catalog {
    /// No default lines: months start empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The household template the bot has always shipped with.
    pub fn household() -> Self {
        Self {
            expenses: vec![
                ("🎁", "Подарок"),
                ("🏠", "Ипотека"),
                ("💳", "Кредиты"),
                ("📌", "Долги"),
                ("🏢", "Коммуналка"),
                ("🚌", "Проездной"),
                ("🧪", "Анализы"),
                ("🛁", "Ремонт"),
                ("🚗", "Проезд"),
                ("🍴", "Еда в офисе"),
                ("💄", "Бьюти"),
                ("📝", "Англ. язык"),
                ("💅", "Косметика"),
            ],
            income: vec!["Зарплата", "Аванс", "Дополнительные доходы"],
        }
    }
}
