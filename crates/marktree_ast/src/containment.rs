//! Structural containment policy.
//!
//! Producers ask [`can_contain`] before attaching a child; the mutation
//! primitives on [`Node`](crate::Node) never consult it.

use crate::NodeKind;

/// Returns true if a node of kind `parent` may hold a child of kind `child`.
///
/// | parent                      | allowed children          |
/// |-----------------------------|---------------------------|
/// | List                        | Item                      |
/// | Document, BlockQuote, Item  | anything except Item      |
/// | Table                       | TableHead, TableBody      |
/// | TableHead, TableBody        | TableRow                  |
/// | TableRow                    | TableCell                 |
/// | anything else               | nothing                   |
///
/// Inline containers such as `Paragraph` or `Link` answer `false` for every
/// child: the table only governs block structure. See
/// [`NodeKind::has_containment_rules`].
pub const fn can_contain(parent: NodeKind, child: NodeKind) -> bool {
    match parent {
        NodeKind::List => matches!(child, NodeKind::Item),
        NodeKind::Document | NodeKind::BlockQuote | NodeKind::Item => {
            !matches!(child, NodeKind::Item)
        }
        NodeKind::Table => matches!(child, NodeKind::TableHead | NodeKind::TableBody),
        NodeKind::TableHead | NodeKind::TableBody => matches!(child, NodeKind::TableRow),
        NodeKind::TableRow => matches!(child, NodeKind::TableCell),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Independent restatement of the policy, pair by pair.
    fn expected(parent: NodeKind, child: NodeKind) -> bool {
        use NodeKind::*;
        match (parent, child) {
            (List, Item) => true,
            (List, _) => false,
            (Document | BlockQuote | Item, Item) => false,
            (Document | BlockQuote | Item, _) => true,
            (Table, TableHead) | (Table, TableBody) => true,
            (TableHead, TableRow) | (TableBody, TableRow) => true,
            (TableRow, TableCell) => true,
            _ => false,
        }
    }

    #[test]
    fn test_policy_is_exhaustive() {
        for parent in NodeKind::ALL {
            for child in NodeKind::ALL {
                assert_eq!(
                    can_contain(parent, child),
                    expected(parent, child),
                    "can_contain({}, {})",
                    parent,
                    child
                );
            }
        }
    }

    #[test]
    fn test_only_rule_governed_kinds_accept_children() {
        for parent in NodeKind::ALL {
            let accepts_any = NodeKind::ALL.iter().any(|&c| can_contain(parent, c));
            assert_eq!(accepts_any, parent.has_containment_rules(), "{}", parent);
        }
    }

    #[rstest]
    #[case::list_item(NodeKind::List, NodeKind::Item, true)]
    #[case::list_paragraph(NodeKind::List, NodeKind::Paragraph, false)]
    #[case::item_list(NodeKind::Item, NodeKind::List, true)]
    #[case::item_item(NodeKind::Item, NodeKind::Item, false)]
    #[case::document_item(NodeKind::Document, NodeKind::Item, false)]
    #[case::quote_quote(NodeKind::BlockQuote, NodeKind::BlockQuote, true)]
    #[case::document_text(NodeKind::Document, NodeKind::Text, true)]
    #[case::table_row(NodeKind::Table, NodeKind::TableRow, false)]
    #[case::table_head(NodeKind::Table, NodeKind::TableHead, true)]
    #[case::body_row(NodeKind::TableBody, NodeKind::TableRow, true)]
    #[case::row_cell(NodeKind::TableRow, NodeKind::TableCell, true)]
    #[case::cell_text(NodeKind::TableCell, NodeKind::Text, false)]
    #[case::paragraph_text(NodeKind::Paragraph, NodeKind::Text, false)]
    #[case::text_text(NodeKind::Text, NodeKind::Text, false)]
    fn test_can_contain(#[case] parent: NodeKind, #[case] child: NodeKind, #[case] allowed: bool) {
        assert_eq!(can_contain(parent, child), allowed);
    }
}
