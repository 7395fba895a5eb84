use tunetally::types::Query;
use tunetally::utils::{initial_letter, parse_rank_range};

#[test]
fn test_initial_letter() {
    assert_eq!(initial_letter("adele"), "A");
    assert_eq!(initial_letter("The Weeknd"), "T");
    assert_eq!(initial_letter("21 Savage"), "S");
    assert_eq!(initial_letter("Ólafur Arnalds"), "Ó");
    assert_eq!(initial_letter("112"), "#");
    assert_eq!(initial_letter(""), "#");
}

#[test]
fn test_parse_rank_range() {
    assert_eq!(parse_rank_range("11-25"), Ok((11, 25)));
    assert_eq!(parse_rank_range(" 1 - 10 "), Ok((1, 10)));
    assert!(parse_rank_range("11").is_err());
    assert!(parse_rank_range("a-5").is_err());
    assert!(parse_rank_range("5-").is_err());
}

#[test]
fn test_query_drops_blank_terms() {
    let query = Query::new(vec![" ".to_string(), " us ".to_string(), "".to_string()]);
    assert_eq!(query.terms, vec!["us"]);
    assert_eq!(query.first(), Some("us"));

    assert!(Query::new(vec![]).is_empty());
    assert_eq!(Query::single("Adele").first(), Some("Adele"));
}
