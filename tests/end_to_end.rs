// tests/end_to_end.rs
use call_sentiment_analyzer::{
    analyze, DeclineAll, JsonFileStore, LexiconStore, MemoryStore, Resolver, ScriptedOperator,
};
use std::fs;

#[test]
fn greeting_with_empty_lexicon_and_no_operator() {
    let store = MemoryStore::default();
    let mut lex = store.load_all().unwrap();
    let mut op = DeclineAll;
    let mut resolver = Resolver::new(&store, &mut op);

    let a = analyze("Hola, buenos dias", &mut lex, &mut resolver).unwrap();
    assert_eq!(a.tokens.len(), 4);
    assert!(a.resolved_words().is_empty());
    assert_eq!(a.report.declined, vec!["Hola", "buenos", "dias"]);
    assert!(a.report.sentiment.is_none());

    let text = a.report.render_text();
    assert!(text.contains("No sentiment-scored words detected."));
    assert!(text.contains("Greeting phase: Missing"));
}

#[test]
fn full_call_against_a_lexicon_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexicon.json");
    fs::write(
        &path,
        r#"{
            "buenos dias": {"token": "SALUDO", "sentimiento": null},
            "buenos": {"token": "PALABRA", "sentimiento": 0.5},
            "cedula": {"token": "IDENTIFICACION_CLIENTE", "sentimiento": null},
            "gracias": {"token": "DESPEDIDA", "sentimiento": 2.0},
            "problema": {"token": "PALABRA", "sentimiento": -2.0}
        }"#,
    )
    .unwrap();
    let store = JsonFileStore::new(&path);
    let mut lex = store.load_all().unwrap();

    // dias: skip suggestions, register as PALABRA 0
    // tiene/un/su: decline
    let mut op = ScriptedOperator::new(["", "y", "PALABRA", "0", "", "n", "", "n", "", "n"]);
    let mut resolver = Resolver::new(&store, &mut op);
    let text = "Buenos dias, tiene un problema? Su cedula. Gracias";
    let a = analyze(text, &mut lex, &mut resolver).unwrap();
    drop(resolver);

    let r = &a.report;
    assert_eq!(r.registered, vec!["dias"]);
    assert_eq!(r.declined, vec!["tiene", "un", "Su"]);
    let s = r.sentiment.as_ref().unwrap();
    assert_eq!(s.total, 0.5);
    assert_eq!(s.most_positive.as_ref().unwrap().key, "gracias");
    assert_eq!(s.most_negative.as_ref().unwrap().key, "problema");
    assert!(r.protocol.greeting);
    assert!(r.protocol.customer_identification);
    assert!(r.protocol.farewell);
    assert!(!r.protocol.prohibited_language);
    assert!(r.protocol.is_compliant());
    assert_eq!(op.remaining(), 0);

    assert!(store.load_all().unwrap().contains("dias"));

    let json: serde_json::Value = serde_json::from_str(&r.to_json().unwrap()).unwrap();
    assert_eq!(json["sentiment"]["verdict"], "POSITIVE");
    assert_eq!(json["registered"][0], "dias");
}
