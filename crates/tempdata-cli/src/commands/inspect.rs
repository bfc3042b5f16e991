use serde_json::{Map, Value, json};
use tempdata::{TempData, Token};
use tempdata_core::ErasedValue;

pub fn inspect(config: &str, db: Option<&str>, session_id: &str, format: &str) -> anyhow::Result<()> {
    let target = super::open(config, db)?;
    // Read straight from the store: going through the provider would
    // consume the payload.
    let payload = target.store.get(session_id, target.provider.session_key())?;
    let Some(payload) = payload else {
        println!("No temp data pending for session {session_id}");
        return Ok(());
    };
    let temp_data = target.provider.decode_payload(&payload)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&to_json(&temp_data))?);
        }
        _ => {
            println!("{}", format_text(session_id, payload.len(), &temp_data));
        }
    }

    Ok(())
}

pub fn list(config: &str, db: Option<&str>) -> anyhow::Result<()> {
    let target = super::open(config, db)?;
    let key = target.provider.session_key();
    let mut found = 0;
    for session_id in target.store.list_sessions()? {
        if let Some(payload) = target.store.get(&session_id, key)? {
            println!("{session_id}\t{} bytes", payload.len());
            found += 1;
        }
    }
    if found == 0 {
        println!("No sessions hold temp data");
    }
    Ok(())
}

fn format_text(session_id: &str, len: usize, temp_data: &TempData) -> String {
    let mut out = format!("Session {session_id} ({len} bytes)\n");
    if temp_data.is_empty() {
        out.push_str("  (placeholder, no values)\n");
    }
    for (key, value) in temp_data.iter() {
        out.push_str(&format!(
            "  {key}: {} = {}\n",
            type_label(value),
            value_to_json(value)
        ));
    }
    out.trim_end().to_string()
}

fn type_label(value: &dyn ErasedValue) -> String {
    match value.downcast_ref::<Token>() {
        Some(token) => token.kind().to_string(),
        None => value.runtime_type_info().to_string(),
    }
}

fn to_json(temp_data: &TempData) -> Value {
    let fields: Map<String, Value> = temp_data
        .iter()
        .map(|(key, value)| (key.to_string(), value_to_json(value)))
        .collect();
    Value::Object(fields)
}

fn value_to_json(value: &dyn ErasedValue) -> Value {
    // Values left generic by the materializer carry no wire encoding of
    // their own.
    let token = if let Some(token) = value.downcast_ref::<Token>() {
        Some(token.clone())
    } else if let Some(tokens) = value.downcast_ref::<Vec<Token>>() {
        Some(Token::Array(tokens.clone()))
    } else {
        value.encode_token()
    };
    token.map_or(Value::Null, token_to_json)
}

fn token_to_json(token: Token) -> Value {
    match token {
        Token::Null => Value::Null,
        Token::String(v) => Value::String(v),
        Token::Integer(v) => json!(v),
        Token::Float(v) => Value::from(v),
        Token::Boolean(v) => Value::Bool(v),
        Token::Guid(v) => Value::String(v.to_string()),
        Token::Date(v) => Value::String(v.to_rfc3339()),
        Token::DateOffset(v) => Value::String(v.to_rfc3339()),
        Token::TimeSpan(v) => Value::from(v.as_secs_f64()),
        Token::Uri(v) => Value::String(v.into()),
        Token::Decimal(v) => Value::String(v.to_string()),
        Token::Array(items) => Value::Array(items.into_iter().map(token_to_json).collect()),
        Token::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(name, value)| (name, token_to_json(value)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdata::{RequestContext, SessionStateTempDataProvider, TempDataProvider};
    use tempdata_session::SessionStore;

    fn stored_payload() -> (SessionStore, SessionStateTempDataProvider) {
        let store = SessionStore::open_in_memory().unwrap();
        let provider = SessionStateTempDataProvider::new();
        let mut session = store.session("s1").unwrap();

        let mut values = TempData::new();
        values.insert("notice", "Saved");
        values.insert("ids", vec![1u8, 2, 3]);
        values.insert("maybe", None::<bool>);
        provider
            .save_temp_data(&mut RequestContext::with_session(&mut session), Some(&values))
            .unwrap();
        (store, provider)
    }

    #[test]
    fn json_rendering_of_a_stored_payload() {
        let (store, provider) = stored_payload();
        let payload = store.get("s1", provider.session_key()).unwrap().unwrap();
        let temp_data = provider.decode_payload(&payload).unwrap();

        assert_eq!(
            to_json(&temp_data),
            json!({ "ids": [1, 2, 3], "maybe": null, "notice": "Saved" })
        );
        // Decoding for display leaves the payload in place.
        assert!(store.get("s1", provider.session_key()).unwrap().is_some());
    }

    #[test]
    fn text_rendering_labels_types() {
        let (store, provider) = stored_payload();
        let payload = store.get("s1", provider.session_key()).unwrap().unwrap();
        let temp_data = provider.decode_payload(&payload).unwrap();

        let text = format_text("s1", payload.len(), &temp_data);
        assert!(text.starts_with("Session s1 ("));
        assert!(text.contains("  ids: Vec<i64> = [1,2,3]"));
        assert!(text.contains("  maybe: null = null"));
        assert!(text.contains("  notice: String = \"Saved\""));
    }

    #[test]
    fn placeholder_renders_as_empty() {
        let text = format_text("s1", 0, &TempData::new());
        assert!(text.contains("placeholder"));
    }

    #[test]
    fn tokens_render_as_plain_json() {
        let id = uuid::Uuid::nil();
        let token = Token::Array(vec![
            Token::Guid(id),
            Token::TimeSpan(std::time::Duration::from_millis(1500)),
            Token::Object(vec![("a".into(), Token::Integer(1))]),
        ]);
        assert_eq!(
            token_to_json(token),
            json!(["00000000-0000-0000-0000-000000000000", 1.5, { "a": 1 }])
        );
    }
}
