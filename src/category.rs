//! The category catalog read from the workbook's second worksheet.
//!
//! Categories label transactions ("Moradia", "Mercado", ...) and drive the
//! select boxes on the transaction forms. The catalog is read-only from the
//! app's point of view; it is edited directly in the workbook.

use crate::transaction::TransactionKind;

/// Column order of the category worksheet.
pub(crate) const CATEGORY_COLUMNS: [&str; 2] = ["kind", "name"];

/// Expense categories treated as recurring bills by default.
///
/// The split only affects how the expense select box is grouped; any
/// expense category not in this list is offered as a variable expense.
const FIXED_CATEGORY_NAMES: [&str; 5] = [
    "Moradia",
    "Assinaturas",
    "Educação",
    "Contas",
    "Empréstimos",
];

/// One entry of the category catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Whether the category labels income or expense rows.
    pub kind: TransactionKind,
    /// The label itself.
    pub name: String,
}

impl Category {
    /// Parse a catalog entry from raw worksheet cells.
    ///
    /// Returns `None` for rows with an unknown kind or an empty name; such
    /// rows are dropped rather than surfaced.
    pub(crate) fn from_row(row: &[String]) -> Option<Self> {
        let kind = TransactionKind::parse(row.first()?)?;
        let name = row.get(1)?.trim();

        if name.is_empty() {
            return None;
        }

        Some(Self {
            kind,
            name: name.to_owned(),
        })
    }
}

/// The built-in catalog used when the category worksheet cannot be read or
/// is empty. Keeps the forms usable on a fresh workbook.
pub(crate) fn default_catalog() -> Vec<Category> {
    let income = ["Salário", "Rendimentos", "Outras receitas"];
    let expense = [
        "Moradia",
        "Assinaturas",
        "Educação",
        "Contas",
        "Empréstimos",
        "Mercado",
        "Transporte",
        "Lazer",
        "Saúde",
    ];

    income
        .into_iter()
        .map(|name| Category {
            kind: TransactionKind::Income,
            name: name.to_owned(),
        })
        .chain(expense.into_iter().map(|name| Category {
            kind: TransactionKind::Expense,
            name: name.to_owned(),
        }))
        .collect()
}

/// The category names offered by the transaction form, grouped the way the
/// form groups them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOptions {
    /// Income category names.
    pub income: Vec<String>,
    /// Expense categories treated as recurring bills.
    pub fixed_expense: Vec<String>,
    /// The remaining expense categories.
    pub variable_expense: Vec<String>,
}

/// Split a catalog into the form's option groups.
///
/// If the fixed/variable split leaves either expense group empty, both
/// groups fall back to the full expense list so no category becomes
/// unreachable from the form.
pub(crate) fn category_options(catalog: &[Category]) -> CategoryOptions {
    let income = names_of_kind(catalog, TransactionKind::Income);
    let expense = names_of_kind(catalog, TransactionKind::Expense);

    let mut fixed_expense: Vec<String> = expense
        .iter()
        .filter(|name| FIXED_CATEGORY_NAMES.contains(&name.as_str()))
        .cloned()
        .collect();
    let mut variable_expense: Vec<String> = expense
        .iter()
        .filter(|name| !FIXED_CATEGORY_NAMES.contains(&name.as_str()))
        .cloned()
        .collect();

    if fixed_expense.is_empty() || variable_expense.is_empty() {
        fixed_expense = expense.clone();
        variable_expense = expense;
    }

    CategoryOptions {
        income,
        fixed_expense,
        variable_expense,
    }
}

fn names_of_kind(catalog: &[Category], kind: TransactionKind) -> Vec<String> {
    let mut names: Vec<String> = catalog
        .iter()
        .filter(|category| category.kind == kind)
        .map(|category| category.name.clone())
        .collect();
    names.dedup();

    names
}

#[cfg(test)]
mod tests {
    use crate::transaction::TransactionKind;

    use super::{Category, category_options, default_catalog};

    fn expense(name: &str) -> Category {
        Category {
            kind: TransactionKind::Expense,
            name: name.to_owned(),
        }
    }

    fn income(name: &str) -> Category {
        Category {
            kind: TransactionKind::Income,
            name: name.to_owned(),
        }
    }

    #[test]
    fn from_row_parses_known_kinds() {
        let row = vec!["Expense".to_owned(), "Mercado".to_owned()];

        assert_eq!(Category::from_row(&row), Some(expense("Mercado")));
    }

    #[test]
    fn from_row_drops_unknown_kind_and_empty_name() {
        assert_eq!(
            Category::from_row(&["Transfer".to_owned(), "Mercado".to_owned()]),
            None
        );
        assert_eq!(
            Category::from_row(&["Expense".to_owned(), "  ".to_owned()]),
            None
        );
        assert_eq!(Category::from_row(&["Expense".to_owned()]), None);
    }

    #[test]
    fn options_split_expenses_into_fixed_and_variable() {
        let catalog = vec![
            income("Salário"),
            expense("Moradia"),
            expense("Mercado"),
            expense("Lazer"),
        ];

        let options = category_options(&catalog);

        assert_eq!(options.income, vec!["Salário"]);
        assert_eq!(options.fixed_expense, vec!["Moradia"]);
        assert_eq!(options.variable_expense, vec!["Mercado", "Lazer"]);
    }

    #[test]
    fn one_sided_split_falls_back_to_all_expenses() {
        let catalog = vec![expense("Mercado"), expense("Lazer")];

        let options = category_options(&catalog);

        assert_eq!(options.fixed_expense, vec!["Mercado", "Lazer"]);
        assert_eq!(options.variable_expense, vec!["Mercado", "Lazer"]);
    }

    #[test]
    fn default_catalog_covers_both_kinds() {
        let catalog = default_catalog();

        assert!(
            catalog
                .iter()
                .any(|category| category.kind == TransactionKind::Income)
        );
        assert!(
            catalog
                .iter()
                .any(|category| category.kind == TransactionKind::Expense)
        );
    }
}
