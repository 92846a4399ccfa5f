//! Property tests against the public API of `bnode`.

use bnode::{Forest, NodeId};
use quickcheck::{Arbitrary, Gen};

mod forest;

/// Installs a test logger so `RUST_LOG=bnode=trace` shows what the forest did.
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A random tree, described as the order in which values get attached. Each entry says which
/// earlier node to hang the value from and on which side.
#[derive(Clone, Debug)]
struct Plan {
    root: i8,
    children: Vec<(usize, bool, i8)>,
}

impl Arbitrary for Plan {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            root: i8::arbitrary(g),
            children: Vec::arbitrary(g),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let root = self.root;
        Box::new(
            self.children
                .shrink()
                .map(move |children| Plan { root, children }),
        )
    }
}

impl Plan {
    /// Builds the planned tree. Later children may displace earlier ones; displaced subtrees
    /// are cleared so that only the returned tree is left in the forest.
    fn build(&self, forest: &mut Forest<i8>) -> NodeId {
        let root = forest.insert(self.root);
        let mut nodes = vec![root];
        for &(parent, left, value) in &self.children {
            let parent = nodes[parent % nodes.len()];
            let attached = if left {
                forest.add_left_value(parent, value)
            } else {
                forest.add_right_value(parent, value)
            };
            let (child, mut displaced) = attached.unwrap();
            forest.clear(&mut displaced);

            nodes.retain(|&id| forest.contains(id));
            nodes.push(child);
        }

        root
    }
}
