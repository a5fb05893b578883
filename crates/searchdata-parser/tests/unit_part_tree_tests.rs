//! Method-name grammar through the public API

use searchdata_parser::{Direction, ParseError, PartKind, PartTree, QueryKind};

fn kinds(method: &str) -> Vec<PartKind> {
    PartTree::parse(method).unwrap().parts().map(|p| p.kind()).collect()
}

#[test]
fn test_every_query_prefix_selects() {
    for prefix in ["find", "read", "get", "query", "search", "stream"] {
        let tree = PartTree::parse(&format!("{}ByEmail", prefix)).unwrap();
        assert_eq!(tree.subject().kind(), QueryKind::Select, "{}", prefix);
        assert_eq!(tree.parts().next().unwrap().property(), "email");
    }
}

#[test]
fn test_subject_text_between_prefix_and_by_is_ignored() {
    let tree = PartTree::parse("findPeopleByEmail").unwrap();
    assert_eq!(tree.subject().kind(), QueryKind::Select);
    assert!(!tree.is_limiting());
    assert_eq!(tree.parts().count(), 1);
}

#[test]
fn test_comparison_keywords() {
    assert_eq!(
        kinds("findByAgeLessThanEqualAndAgeGreaterThanEqualAndBirthBeforeAndBirthAfter"),
        vec![
            PartKind::LessThanEqual,
            PartKind::GreaterThanEqual,
            PartKind::Before,
            PartKind::After,
        ]
    );
    assert_eq!(
        kinds("findByNameStartingWithAndNameEndingWithAndNameContainingAndNameLike"),
        vec![
            PartKind::StartingWith,
            PartKind::EndingWith,
            PartKind::Containing,
            PartKind::Like,
        ]
    );
    assert_eq!(
        kinds("findByLocationNearAndAreaWithinAndCodeRegexAndTagExists"),
        vec![PartKind::Near, PartKind::Within, PartKind::Regex, PartKind::Exists]
    );
    assert_eq!(
        kinds("findByNameNotAndNameIsAndActiveFalse"),
        vec![
            PartKind::NegatingSimpleProperty,
            PartKind::SimpleProperty,
            PartKind::False,
        ]
    );
}

#[test]
fn test_argument_count_per_part() {
    let tree = PartTree::parse("findByAgeBetweenAndNameIsNullAndTagsIn").unwrap();
    let counts: Vec<usize> = tree.parts().map(|p| p.number_of_arguments()).collect();
    assert_eq!(counts, vec![2, 0, 1]);
    assert_eq!(tree.number_of_arguments(), 3);
}

#[test]
fn test_order_without_direction_is_ascending() {
    let tree = PartTree::parse("findByCityOrderByLastName").unwrap();
    assert_eq!(tree.orders().len(), 1);
    assert_eq!(tree.orders()[0].property, "lastName");
    assert_eq!(tree.orders()[0].direction, Direction::Asc);
}

#[test]
fn test_order_without_criteria() {
    let tree = PartTree::parse("findAllByOrderByNameDesc").unwrap();
    assert_eq!(tree.parts().count(), 0);
    assert_eq!(tree.number_of_arguments(), 0);
    assert_eq!(tree.orders()[0].direction, Direction::Desc);
}

#[test]
fn test_nested_property_notation() {
    let tree = PartTree::parse("findByAddress_City").unwrap();
    assert_eq!(tree.parts().next().unwrap().property(), "address_City");
}

#[test]
fn test_invalid_method_names() {
    for method in ["", "findByNameOrderBy", "findByNameOrderByDesc"] {
        assert!(PartTree::parse(method).is_err(), "{:?} should not parse", method);
    }
}

#[test]
fn test_result_limit_out_of_range_is_rejected() {
    let err = PartTree::parse("findTop99999999999999999999999ByLastName").unwrap_err();
    assert!(matches!(err, ParseError::InvalidMethodName { .. }));

    assert_eq!(PartTree::parse("findTopByLastName").unwrap().max_results(), Some(1));
    assert_eq!(PartTree::parse("findFirst25ByLastName").unwrap().max_results(), Some(25));
}
