//! Category labels shared by transactions, budgets and summaries.

/// The label used for transactions and budgets without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The categories offered when recording a transaction.
///
/// Other category names are accepted, this list only drives suggestions and
/// warnings for likely typos.
pub const KNOWN_CATEGORIES: [&str; 7] = [
    "Salary",
    "Food",
    "Transport",
    "Shopping",
    "Utilities",
    "Health",
    "Miscellaneous",
];

/// Get the label a category is grouped under.
///
/// Surrounding whitespace is ignored and an empty category maps to
/// [UNCATEGORIZED_LABEL]. Otherwise the name is used as is, so grouping is
/// case sensitive.
pub fn category_label(category: &str) -> &str {
    let category = category.trim();

    if category.is_empty() {
        UNCATEGORIZED_LABEL
    } else {
        category
    }
}

/// Whether `category` is one of the [KNOWN_CATEGORIES] or the uncategorized label.
pub fn is_known_category(category: &str) -> bool {
    let label = category_label(category);

    label == UNCATEGORIZED_LABEL || KNOWN_CATEGORIES.contains(&label)
}
