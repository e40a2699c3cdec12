/// A node of a tiered network: one of the labelled nodes, or the super source feeding every
/// terminal, or the super sink collecting from every shop.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug)]
pub enum Node<L> {
    Source,
    Sink,
    WithId(L),
}

impl<L> Node<L> {
    pub fn label(&self) -> Option<&L> {
        match self {
            Node::WithId(l) => Some(l),
            _ => None,
        }
    }
}
