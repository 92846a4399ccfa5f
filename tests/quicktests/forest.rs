use bnode::{Forest, NodeId};

use crate::{init_logger, Plan};

/// Checks that every node below `root` is the parent of its children and returns how many nodes
/// were visited.
fn count_linked(forest: &Forest<i8>, root: Option<NodeId>) -> Option<usize> {
    let Some(root) = root else {
        return Some(0);
    };
    let node = forest.get(root)?;
    for child in node.left().into_iter().chain(node.right()) {
        if forest.get(child)?.parent() != Some(root) {
            return None;
        }
    }

    Some(count_linked(forest, node.left())? + count_linked(forest, node.right())? + 1)
}

quickcheck::quickcheck! {
    fn built_trees_are_linked(plan: Plan) -> bool {
        init_logger();
        let mut forest = Forest::new();
        let root = plan.build(&mut forest);

        count_linked(&forest, Some(root)) == Some(forest.size(Some(root)))
            && forest.size(Some(root)) == forest.len()
    }
}

quickcheck::quickcheck! {
    fn copy_outlives_source(plan: Plan) -> bool {
        init_logger();
        let mut forest = Forest::new();
        let root = plan.build(&mut forest);
        let copy = forest.copy(Some(root)).unwrap();

        let mut expected = Forest::new();
        let expected_root = plan.build(&mut expected);

        let mut root = Some(root);
        forest.clear(&mut root);

        root.is_none()
            && forest.subtree(copy) == expected.subtree(Some(expected_root))
            && count_linked(&forest, copy) == Some(forest.len())
    }
}

quickcheck::quickcheck! {
    fn assign_matches_any_shape(dest: Plan, src: Plan) -> bool {
        init_logger();
        let mut forest = Forest::new();
        let dest_root = dest.build(&mut forest);
        let src_root = src.build(&mut forest);

        let mut dest = Some(dest_root);
        forest.assign(&mut dest, Some(src_root)).unwrap();

        dest == Some(dest_root)
            && forest.subtree(dest) == forest.subtree(Some(src_root))
            && count_linked(&forest, dest) == Some(forest.size(Some(src_root)))
            && forest.len() == 2 * forest.size(Some(src_root))
    }
}

quickcheck::quickcheck! {
    fn clear_leaves_nothing(plan: Plan) -> bool {
        init_logger();
        let mut forest = Forest::new();
        let mut root = Some(plan.build(&mut forest));
        forest.clear(&mut root);

        root.is_none() && forest.size(root) == 0 && forest.is_empty()
    }
}
