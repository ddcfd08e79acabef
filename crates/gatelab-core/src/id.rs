use slotmap::new_key_type;

new_key_type! {
    /// Identifies a node (gate, input switch, or output LED) in a circuit.
    pub struct NodeId;

    /// Identifies a wire connecting an output pin to an input pin.
    pub struct WireId;
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn node_ids_are_unique_per_graph_instance() {
        let mut a = SlotMap::<NodeId, ()>::with_key();
        let first = a.insert(());
        let second = a.insert(());
        assert_ne!(first, second);
    }

    #[test]
    fn ids_survive_unrelated_removal() {
        let mut sm = SlotMap::<NodeId, u8>::with_key();
        let keep = sm.insert(1);
        let drop = sm.insert(2);
        sm.remove(drop);
        assert_eq!(sm[keep], 1);
    }
}
