//! String query templates and value expressions

use searchdata_core::Value;
use searchdata_parser::{ExpressionParser, ParseError, PathSegment, QueryTemplate, Segment, ValueExpression};

#[test]
fn test_template_mixes_placeholders_and_expressions() {
    let template = QueryTemplate::parse(
        r##"{"bool":{"must":[{"term":{"lastName":"?0"}},{"term":{"city":"#{#address.city}"}}]}}"##,
    )
    .unwrap();

    let placeholders: Vec<&Segment> = template
        .segments()
        .iter()
        .filter(|s| !matches!(s, Segment::Literal(_)))
        .collect();
    assert_eq!(placeholders.len(), 2);
    assert_eq!(placeholders[0], &Segment::Positional(0));
    match placeholders[1] {
        Segment::Expression { source, expression } => {
            assert_eq!(source, "#address.city");
            assert_eq!(
                expression,
                &ValueExpression::Parameter {
                    name: "address".to_string(),
                    path: vec![PathSegment::Field("city".to_string())],
                }
            );
        }
        other => panic!("expected expression, got {:?}", other),
    }
}

#[test]
fn test_source_is_preserved() {
    let source = r#"{"match_all":{}}"#;
    let template = QueryTemplate::parse(source).unwrap();
    assert_eq!(template.source(), source);
    assert!(template.is_static());
}

#[test]
fn test_multi_digit_placeholder() {
    let template = QueryTemplate::parse("?12").unwrap();
    assert_eq!(template.segments(), &[Segment::Positional(12)]);
}

#[test]
fn test_unterminated_expression_is_rejected() {
    let err = QueryTemplate::parse(r##"{"term":{"name":"#{#name"##).unwrap_err();
    assert!(matches!(err, ParseError::UnterminatedExpression { .. }));
}

#[test]
fn test_invalid_expression_body_is_rejected() {
    assert!(matches!(
        QueryTemplate::parse("#{}"),
        Err(ParseError::InvalidExpression(_))
    ));
    assert!(QueryTemplate::parse("#{#}").is_err());
}

#[test]
fn test_expression_literals() {
    assert_eq!(
        ExpressionParser::parse("'it''s'").unwrap(),
        ValueExpression::Literal(Value::String("it's".to_string()))
    );
    assert_eq!(
        ExpressionParser::parse("true").unwrap(),
        ValueExpression::Literal(Value::Bool(true))
    );
    assert_eq!(
        ExpressionParser::parse("null").unwrap(),
        ValueExpression::Literal(Value::Null)
    );
}

#[test]
fn test_positional_expression_with_index_path() {
    assert_eq!(
        ExpressionParser::parse("[0].tags[1]").unwrap(),
        ValueExpression::Positional {
            index: 0,
            path: vec![
                PathSegment::Field("tags".to_string()),
                PathSegment::Index(1),
            ],
        }
    );
}
