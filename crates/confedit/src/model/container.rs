/// Ordered sibling-list behavior shared by every node that holds children.
///
/// The child list order is the serialization order, and an index into it is
/// the sole addressing scheme for navigation and removal. Insertion takes the
/// node by value: a node is owned by at most one container, so moving content
/// between trees means removing it first (or cloning it).
///
/// Property insertion should normally go through the typed section API
/// ([`crate::Section::set`], builders, [`crate::Section::add_property`]) so
/// that normalized keys are installed; the generic methods here are for
/// comment/space surgery and positional removal.
pub trait Container {
    type Child;

    fn children(&self) -> &[Self::Child];
    fn children_mut(&mut self) -> &mut Vec<Self::Child>;

    fn len(&self) -> usize {
        self.children().len()
    }

    fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    fn first(&self) -> Option<&Self::Child> {
        self.children().first()
    }

    fn last(&self) -> Option<&Self::Child> {
        self.children().last()
    }

    fn iter(&self) -> std::slice::Iter<'_, Self::Child> {
        self.children().iter()
    }

    /// The child `offset` positions away from `idx`, or `None` past either
    /// end. `sibling(idx, 1)` and `sibling(idx, -1)` are the next and
    /// previous siblings.
    fn sibling(&self, idx: usize, offset: isize) -> Option<&Self::Child> {
        let target = idx.checked_add_signed(offset)?;
        self.children().get(target)
    }

    /// Insert `child` at `idx`, shifting later siblings.
    fn insert(&mut self, idx: usize, child: Self::Child) {
        self.children_mut().insert(idx, child);
    }

    fn push(&mut self, child: Self::Child) {
        self.children_mut().push(child);
    }

    /// Detach and return the child at `idx`. The node itself is preserved for
    /// reuse; only its place in this container is given up.
    fn remove(&mut self, idx: usize) -> Self::Child {
        self.children_mut().remove(idx)
    }
}
