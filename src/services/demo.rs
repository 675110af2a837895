use serde_json::{json, Map, Value};

pub const DEMO_USER_ID: &str = "00000000-0000-0000-0000-000000000000";

const REDACTED: &str = "[redacted]";

/// Simulated dashboard shown to visitors in demo mode
pub fn demo_dashboard() -> Value {
    json!({
        "demo": true,
        "profile": {
            "id": DEMO_USER_ID,
            "full_name": "Visitor Demo",
            "email": "demo@casewaylaw.ai",
            "year": 2,
            "user_type": "student"
        },
        "module": {
            "id": "11111111-1111-1111-1111-111111111111",
            "code": "LAW2041",
            "title": "EU Law: The Internal Market",
            "year_level": 2,
            "term": "Epiphany"
        },
        "lectures": [
            {
                "id": "eu-law-goods",
                "title": "Free Movement of Goods: Art 34-36 TFEU",
                "lecturer_name": "Dr. Aris Georgopoulos",
                "module_code": "LAW2041",
                "status": "ready",
                "summary": "Prohibitions on trade barriers within the EU, specifically Articles 34-36 TFEU.",
                "key_points": [
                    "Article 34 prohibits QRs and MEQRs.",
                    "Dassonville formula: broad definition of MEQRs.",
                    "Cassis de Dijon: mutual recognition and the mandatory requirements exception.",
                    "Article 36: exhaustive grounds for justification."
                ]
            },
            {
                "id": "eu-law-citizenship",
                "title": "Citizenship and the Internal Market",
                "lecturer_name": "Prof. Eleanor Spaventa",
                "module_code": "LAW2041",
                "status": "ready",
                "summary": "From market citizen to Union citizen: status versus economic activity.",
                "key_points": [
                    "Art 20 TFEU: fundamental status of nationals.",
                    "Art 21 TFEU: right to move and reside.",
                    "Baumbast and its implications."
                ]
            }
        ],
        "tasks": [
            { "title": "Read Dassonville and Cassis de Dijon", "status": "completed", "due_date": "2026-01-20" },
            { "title": "Draft plan for Internal Market problem question", "status": "open", "due_date": "2026-02-10" },
            { "title": "Review citizenship seminar notes", "status": "open", "due_date": null }
        ],
        "assignment": {
            "title": "Internal Market Problem Question",
            "module_code": "LAW2041",
            "deadline": "2026-02-14T23:59:59Z"
        }
    })
}

/// Replace every case-insensitive occurrence of a deny-listed term in every string of `value`
pub fn scrub(value: Value, deny_list: &[String]) -> Value {
    match value {
        Value::String(s) => Value::String(scrub_text(&s, deny_list)),
        Value::Array(items) => Value::Array(items.into_iter().map(|v| scrub(v, deny_list)).collect()),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                let key = scrub_text(&k, deny_list);
                let value = scrub(v, deny_list);
                match free_key(&out, key, deny_list) {
                    Some(key) => {
                        out.insert(key, value);
                    }
                    None => tracing::warn!("Dropped demo field {:?}: no free key after scrubbing", k),
                }
            }
            Value::Object(out)
        }
        other => other,
    }
}

/// `key` if unused, else the first unused scrubbed `key_2`, `key_3`, ...
fn free_key(map: &Map<String, Value>, key: String, deny_list: &[String]) -> Option<String> {
    if !map.contains_key(&key) {
        return Some(key);
    }
    (2..=map.len() + 2)
        .map(|n| scrub_text(&format!("{}_{}", key, n), deny_list))
        .find(|candidate| !map.contains_key(candidate))
}

/// ASCII case-insensitive replacement. Falls back to deletion when the marker itself
/// would reintroduce a denied term, and repeats until no term remains.
pub fn scrub_text(text: &str, deny_list: &[String]) -> String {
    let terms: Vec<&str> = deny_list.iter().map(|t| t.as_str()).filter(|t| !t.is_empty()).collect();
    if terms.is_empty() {
        return text.to_string();
    }

    let marked = terms.iter().fold(text.to_string(), |acc, term| replace_ci(&acc, term, REDACTED));
    if !contains_any(&marked, &terms) {
        return marked;
    }

    let mut out = marked;
    while contains_any(&out, &terms) {
        out = terms.iter().fold(out, |acc, term| replace_ci(&acc, term, ""));
    }
    out
}

pub fn contains_any(text: &str, terms: &[&str]) -> bool {
    let lower = text.to_ascii_lowercase();
    terms.iter().any(|t| lower.contains(&t.to_ascii_lowercase()))
}

fn replace_ci(haystack: &str, needle: &str, replacement: &str) -> String {
    let lower = haystack.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    for (start, _) in lower.match_indices(&needle) {
        out.push_str(&haystack[last..start]);
        out.push_str(replacement);
        last = start + needle.len();
    }
    out.push_str(&haystack[last..]);
    out
}
