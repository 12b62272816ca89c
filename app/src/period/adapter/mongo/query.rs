use mongodb::bson::{Bson, Document, doc};

use crate::period::{Condition, Filter};

/// Renders a filter as a MongoDB query document. Clauses on the same field share one operator
/// document; a clause whose operator is already taken for that field goes to a top-level `$and`,
/// so no clause ever replaces another.
pub fn filter_document(filter: &Filter) -> Document {
    let mut query = Document::new();
    let mut overflow: Vec<Bson> = Vec::new();

    for (field, condition) in filter.clauses() {
        let operators = operator_document(condition);

        match query.get_mut(field) {
            None => {
                query.insert(field.clone(), operators);
            }
            Some(Bson::Document(existing)) if operators.keys().all(|op| !existing.contains_key(op)) => {
                for (op, value) in operators {
                    existing.insert(op, value);
                }
            }
            Some(_) => {
                let mut clause = Document::new();
                clause.insert(field.clone(), operators);
                overflow.push(Bson::Document(clause));
            }
        }
    }

    if !overflow.is_empty() {
        query.insert("$and", overflow);
    }

    query
}

fn operator_document(condition: &Condition) -> Document {
    match condition {
        Condition::Eq(value) => doc! { "$eq": Bson::from(value) },
        Condition::Ne(value) => doc! { "$ne": Bson::from(value) },
        Condition::Gt(value) => doc! { "$gt": Bson::from(value) },
        Condition::Gte(value) => doc! { "$gte": Bson::from(value) },
        Condition::Lt(value) => doc! { "$lt": Bson::from(value) },
        Condition::Lte(value) => doc! { "$lte": Bson::from(value) },
        Condition::In(values) => doc! { "$in": values.iter().map(Bson::from).collect::<Vec<_>>() },
        Condition::Regex {
            pattern,
            case_insensitive: true,
        } => doc! { "$regex": pattern.as_str(), "$options": "i" },
        Condition::Regex { pattern, .. } => doc! { "$regex": pattern.as_str() },
        Condition::Exists(exists) => doc! { "$exists": *exists },
    }
}

pub fn sort_document(sort_by: &str) -> Document {
    let mut sort = Document::new();
    sort.insert(sort_by, 1);
    sort
}

/// `$match` the filter, tag every record with the period label, then sort ascending.
pub fn annotated_pipeline(filter: &Filter, sort_by: &str, period_info: &str) -> Vec<Document> {
    vec![
        doc! { "$match": filter_document(filter) },
        doc! {
            "$addFields": {
                "isInPeriod": true,
                "periodInfo": period_info,
            }
        },
        doc! { "$sort": sort_document(sort_by) },
    ]
}
