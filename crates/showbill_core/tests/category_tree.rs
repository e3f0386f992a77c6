use showbill_core::{CategoryError, CategoryTree, Poster, PosterKind};

#[test]
fn child_count_includes_parent_total() {
    let mut tree = CategoryTree::new();
    let c1 = tree.create("C1", None);
    let c2 = tree.create("C2", Some(&c1));

    let _a = Poster::create(PosterKind::Music, "a", &c1);
    let _b = Poster::create(PosterKind::Music, "b", &c1);
    let _c = Poster::create(PosterKind::Music, "c", &c2);

    assert_eq!(c1.poster_count(), 2);
    assert_eq!(c2.poster_count(), 3);
}

#[test]
fn count_compounds_along_the_ancestor_chain() {
    let mut tree = CategoryTree::new();
    let root = tree.create("root", None);
    let mid = tree.create("mid", Some(&root));
    let leaf = tree.create("leaf", Some(&mid));
    let sibling = tree.create("sibling", Some(&root));

    let _r = Poster::create(PosterKind::Films, "r", &root);
    let _m = Poster::create(PosterKind::Films, "m", &mid);
    let _s = Poster::create(PosterKind::Films, "s", &sibling);

    assert_eq!(root.poster_count(), 1);
    assert_eq!(mid.poster_count(), 2);
    assert_eq!(leaf.poster_count(), 2);
    assert_eq!(sibling.poster_count(), 2);
}

#[test]
fn dropped_posters_stop_counting() {
    let mut tree = CategoryTree::new();
    let category = tree.create("Cinema", None);
    let kept = Poster::create(PosterKind::Films, "kept", &category);
    drop(Poster::create(PosterKind::Films, "dropped", &category));

    assert_eq!(category.direct_poster_count(), 1);
    assert!(std::rc::Rc::ptr_eq(&category.posters()[0], &kept));
}

#[test]
fn find_by_id_scans_all_created_categories() {
    let mut tree = CategoryTree::new();
    for name in ["a", "b", "c"] {
        tree.create(name, None);
    }

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.find_by_id(2).unwrap().name(), "c");
    assert_eq!(
        tree.find_by_id(3).unwrap_err(),
        CategoryError::CategoryNotFound(3)
    );
}
