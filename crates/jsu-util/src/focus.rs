//! Keyboard focus helpers over an arbitrary element tree.

/// A node that can receive focus and has ordered children.
pub trait FocusNode: Sized {
    fn children(&self) -> &[Self];

    /// Try to focus this node; `true` when it now holds focus.
    fn attempt_focus(&self) -> bool;
}

/// Focus the first focusable node below `node`, depth first.
pub fn focus_first_descendant<N: FocusNode>(node: &N) -> bool {
    node.children()
        .iter()
        .any(|child| child.attempt_focus() || focus_first_descendant(child))
}

/// Focus the last focusable node below `node`, depth first from the end.
pub fn focus_last_descendant<N: FocusNode>(node: &N) -> bool {
    node.children()
        .iter()
        .rev()
        .any(|child| child.attempt_focus() || focus_last_descendant(child))
}

/// The parts of an element that decide whether it takes keyboard focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementTraits<'a> {
    /// Tag name, any case.
    pub tag: &'a str,
    /// Explicit `tabindex` attribute.
    pub tab_index: Option<i32>,
    pub disabled: bool,
    pub href: Option<&'a str>,
    pub rel: Option<&'a str>,
    /// `type` of an `input`.
    pub input_type: Option<&'a str>,
}

/// Whether an element with these traits can take keyboard focus.
///
/// # Examples
///
/// ```
/// use jsu_util::focus::{ElementTraits, is_focusable};
///
/// let input = ElementTraits { tag: "input", ..Default::default() };
/// assert!(is_focusable(&input));
///
/// let hidden = ElementTraits { tag: "input", input_type: Some("hidden"), ..Default::default() };
/// assert!(!is_focusable(&hidden));
/// ```
pub fn is_focusable(element: &ElementTraits<'_>) -> bool {
    if element.tab_index.is_some_and(|index| index >= 0) {
        return true;
    }
    if element.disabled {
        return false;
    }
    match element.tag.to_ascii_uppercase().as_str() {
        "A" => element.href.is_some_and(|href| !href.is_empty()) && element.rel != Some("ignore"),
        "INPUT" => !matches!(element.input_type, Some("hidden" | "file")),
        "BUTTON" | "SELECT" | "TEXTAREA" => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    struct Node {
        id: u32,
        focusable: bool,
        children: Vec<Node>,
        active: Rc<Cell<Option<u32>>>,
    }

    impl FocusNode for Node {
        fn children(&self) -> &[Self] { &self.children }

        fn attempt_focus(&self) -> bool {
            if self.focusable {
                self.active.set(Some(self.id));
            }
            self.focusable
        }
    }

    fn node(id: u32, focusable: bool, children: Vec<Node>, active: &Rc<Cell<Option<u32>>>) -> Node {
        Node {
            id,
            focusable,
            children,
            active: Rc::clone(active),
        }
    }

    #[test]
    fn test_first_and_last_descendants() {
        let active = Rc::new(Cell::new(None));
        let tree = node(
            0,
            false,
            vec![
                node(1, false, vec![node(2, true, vec![], &active)], &active),
                node(3, false, vec![], &active),
                node(4, true, vec![node(5, true, vec![], &active)], &active),
            ],
            &active,
        );

        assert!(focus_first_descendant(&tree));
        assert_eq!(active.get(), Some(2));
        assert!(focus_last_descendant(&tree));
        assert_eq!(active.get(), Some(4));
    }

    #[test]
    fn test_nothing_focusable() {
        let active = Rc::new(Cell::new(None));
        let tree = node(0, true, vec![node(1, false, vec![], &active)], &active);
        assert!(!focus_first_descendant(&tree));
        assert_eq!(active.get(), None);
    }

    #[test]
    fn test_focusable_rules() {
        let link = ElementTraits {
            tag: "a",
            href: Some("/x"),
            ..Default::default()
        };
        assert!(is_focusable(&link));
        assert!(!is_focusable(&ElementTraits { rel: Some("ignore"), ..link }));
        assert!(!is_focusable(&ElementTraits { href: None, ..link }));

        let button = ElementTraits {
            tag: "BUTTON",
            ..Default::default()
        };
        assert!(is_focusable(&button));
        assert!(!is_focusable(&ElementTraits { disabled: true, ..button }));
        assert!(!is_focusable(&ElementTraits {
            input_type: Some("file"),
            tag: "input",
            ..Default::default()
        }));
    }

    #[test]
    fn test_tab_index_overrides() {
        let div = ElementTraits {
            tag: "div",
            ..Default::default()
        };
        assert!(!is_focusable(&div));
        assert!(is_focusable(&ElementTraits { tab_index: Some(0), ..div }));
        assert!(is_focusable(&ElementTraits {
            tab_index: Some(0),
            disabled: true,
            ..div
        }));
        assert!(!is_focusable(&ElementTraits { tab_index: Some(-1), ..div }));
    }
}
