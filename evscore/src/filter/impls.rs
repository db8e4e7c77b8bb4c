use serde_json::{Map, Value};
use super::*;

fn lookup<'a>(doc: &'a Document, property: &str) -> Option<&'a Value> {
    let mut parts = property.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

impl Op {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            Op::Eq(expected) => expected == value,
            Op::In(values) => values.contains(value),
        }
    }

    /// The values this op may match.
    pub fn values(&self) -> &[Value] {
        match self {
            Op::Eq(value) => std::slice::from_ref(value),
            Op::In(values) => values.as_slice(),
        }
    }
}

impl Condition {
    pub fn matches(&self, doc: &Document) -> bool {
        match lookup(doc, &self.property) {
            Some(Value::Array(items)) => items.iter().any(|item| self.op.accepts(item)),
            Some(value) => self.op.accepts(value),
            None => false,
        }
    }
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            property: property.into(),
            op: Op::Eq(value.into()),
        });
        self
    }

    pub fn is_in<V: Into<Value>>(
        mut self,
        property: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.conditions.push(Condition {
            property: property.into(),
            op: Op::In(values.into_iter().map(Into::into).collect()),
        });
        self
    }

    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Conjunction of both filters.
    pub fn and(mut self, other: Filter) -> Self {
        self.conditions.extend(other.conditions);
        self
    }

    /// Drop every condition on the given property.
    pub fn without(mut self, property: &str) -> Self {
        self.conditions.retain(|c| c.property != property);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn has_property(&self, property: &str) -> bool {
        self.conditions.iter().any(|c| c.property == property)
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(doc))
    }
}

fn copy_path(src: &Document, dst: &mut Document, path: &[&str]) {
    match path {
        [] => (),
        [last] => {
            if let Some(value) = src.get(*last) {
                dst.insert(last.to_string(), value.clone());
            }
        }
        [head, rest @ ..] => {
            if let Some(Value::Object(inner)) = src.get(*head) {
                let entry = dst.entry(head.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(dst_inner) = entry {
                    copy_path(inner, dst_inner, rest);
                }
            }
        }
    }
}

impl Projection {
    pub fn all() -> Self {
        Self(None)
    }

    pub fn fields<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self(Some(fields.into_iter().map(Into::into).collect()))
    }

    /// An empty field list is treated as no restriction.
    pub fn from_fields(fields: &[String]) -> Self {
        if fields.is_empty() {
            Self::all()
        } else {
            Self::fields(fields.iter().cloned())
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.0.is_some()
    }

    pub fn field_names(&self) -> Option<&[String]> {
        self.0.as_deref()
    }

    /// Adds the fields to a restricted projection; an unrestricted
    /// projection stays unrestricted.
    pub fn with_fields<S: AsRef<str>>(mut self, required: impl IntoIterator<Item = S>) -> Self {
        if let Some(fields) = self.0.as_mut() {
            for field in required {
                let field = field.as_ref();
                if !fields.iter().any(|f| f == field) {
                    fields.push(field.to_string());
                }
            }
        }
        self
    }

    pub fn apply(&self, doc: Document) -> Document {
        match &self.0 {
            None => doc,
            Some(fields) => {
                let mut result = Map::new();
                for field in fields {
                    let path = field.split('.').collect::<Vec<_>>();
                    copy_path(&doc, &mut result, &path);
                }
                result
            }
        }
    }
}

impl Pagination {
    pub fn new(skip: usize, limit: Option<usize>) -> Self {
        Self { skip, limit }
    }

    pub fn first() -> Self {
        Self { skip: 0, limit: Some(1) }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn matches() {
        let site_area = doc(json!({
            "id": "sa1",
            "siteID": "s1",
            "issuer": true,
            "address": { "city": "Auckland" },
        }));
        assert!(Filter::new().matches(&site_area));
        assert!(Filter::new().eq("siteID", "s1").matches(&site_area));
        assert!(!Filter::new().eq("siteID", "s2").matches(&site_area));
        assert!(Filter::new().is_in("siteID", ["s2", "s1"]).matches(&site_area));
        assert!(!Filter::new().is_in("siteID", Vec::<String>::new()).matches(&site_area));
        assert!(Filter::new().eq("address.city", "Auckland").matches(&site_area));
        assert!(!Filter::new().eq("companyID", "c1").matches(&site_area));
        // bool and string are distinct
        assert!(Filter::new().eq("issuer", true).matches(&site_area));
        assert!(!Filter::new().eq("issuer", "true").matches(&site_area));
    }

    #[test]
    fn matches_array_membership() {
        let car = doc(json!({
            "id": "car1",
            "siteIDs": ["s1", "s3"],
        }));
        assert!(Filter::new().eq("siteIDs", "s3").matches(&car));
        assert!(Filter::new().is_in("siteIDs", ["s2", "s3"]).matches(&car));
        assert!(!Filter::new().is_in("siteIDs", ["s2"]).matches(&car));
    }

    #[test]
    fn and_narrows() {
        let site = doc(json!({ "id": "s1", "companyID": "c1", "issuer": true }));
        let base = Filter::new().eq("id", "s1");
        assert!(base.matches(&site));
        let narrowed = base.clone().and(Filter::new().is_in("companyID", ["c2"]));
        assert!(!narrowed.matches(&site));
        assert_eq!(narrowed.conditions().len(), 2);
        assert!(narrowed.has_property("companyID"));
        assert_eq!(narrowed.without("companyID"), base);
    }

    #[test]
    fn projection() {
        let site = doc(json!({
            "id": "s1",
            "name": "Site One",
            "companyID": "c1",
            "address": { "city": "Auckland", "country": "NZ" },
        }));
        assert_eq!(Projection::all().apply(site.clone()), site);
        assert_eq!(Projection::from_fields(&[]), Projection::all());

        let projected = Projection::fields(["id", "address.city", "missing"])
            .apply(site.clone());
        assert_eq!(
            Value::Object(projected),
            json!({ "id": "s1", "address": { "city": "Auckland" } }),
        );

        let projection = Projection::fields(["name"]).with_fields(["id", "name"]);
        assert_eq!(
            projection.field_names(),
            Some(&["name".to_string(), "id".to_string()][..]),
        );
        assert!(!Projection::all().with_fields(["id"]).is_restricted());
    }
}
