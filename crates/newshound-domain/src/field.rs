//! The five article fields and a per-field container.

use std::fmt;
use std::str::FromStr;

/// One of the five extracted article fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Article author / byline
    Author,
    /// Main headline
    Title,
    /// Publication date
    Date,
    /// Publication time of day
    Time,
    /// Article body text
    Content,
}

impl Field {
    /// All fields in canonical order.
    pub const ALL: [Field; 5] = [
        Field::Author,
        Field::Title,
        Field::Date,
        Field::Time,
        Field::Content,
    ];

    /// Lowercase wire name, as used in LLM prompts and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Author => "author",
            Field::Title => "title",
            Field::Date => "date",
            Field::Time => "time",
            Field::Content => "content",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFieldError(pub String);

impl fmt::Display for ParseFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field name: {}", self.0)
    }
}

impl std::error::Error for ParseFieldError {}

impl FromStr for Field {
    type Err = ParseFieldError;

    /// Case-insensitive: LLM responses occasionally capitalize field names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "author" => Ok(Field::Author),
            "title" => Ok(Field::Title),
            "date" => Ok(Field::Date),
            "time" => Ok(Field::Time),
            "content" => Ok(Field::Content),
            other => Err(ParseFieldError(other.to_string())),
        }
    }
}

/// A value of type `T` for each of the five fields.
///
/// Used for working selector sets (`FieldSet<String>`), extracted values,
/// and per-field selector histories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet<T> {
    /// Value for the author field
    pub author: T,
    /// Value for the title field
    pub title: T,
    /// Value for the date field
    pub date: T,
    /// Value for the time field
    pub time: T,
    /// Value for the content field
    pub content: T,
}

impl<T> FieldSet<T> {
    /// Build a set by calling `f` once per field.
    pub fn from_fn(mut f: impl FnMut(Field) -> T) -> Self {
        Self {
            author: f(Field::Author),
            title: f(Field::Title),
            date: f(Field::Date),
            time: f(Field::Time),
            content: f(Field::Content),
        }
    }

    /// Borrow the value for `field`.
    pub fn get(&self, field: Field) -> &T {
        match field {
            Field::Author => &self.author,
            Field::Title => &self.title,
            Field::Date => &self.date,
            Field::Time => &self.time,
            Field::Content => &self.content,
        }
    }

    /// Mutably borrow the value for `field`.
    pub fn get_mut(&mut self, field: Field) -> &mut T {
        match field {
            Field::Author => &mut self.author,
            Field::Title => &mut self.title,
            Field::Date => &mut self.date,
            Field::Time => &mut self.time,
            Field::Content => &mut self.content,
        }
    }

    /// Replace the value for `field`.
    pub fn set(&mut self, field: Field, value: T) {
        *self.get_mut(field) = value;
    }

    /// Iterate over `(field, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &T)> {
        Field::ALL.iter().map(move |&f| (f, self.get(f)))
    }

    /// Build a new set by transforming each value.
    pub fn map<U>(&self, mut f: impl FnMut(Field, &T) -> U) -> FieldSet<U> {
        FieldSet::from_fn(|field| f(field, self.get(field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_round_trips_through_str() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>().unwrap(), field);
        }
    }

    #[test]
    fn field_parse_is_case_insensitive() {
        assert_eq!("Content".parse::<Field>().unwrap(), Field::Content);
        assert_eq!("AUTHOR".parse::<Field>().unwrap(), Field::Author);
        assert_eq!(" title ".parse::<Field>().unwrap(), Field::Title);
    }

    #[test]
    fn field_parse_rejects_unknown() {
        assert!("headline".parse::<Field>().is_err());
        assert!("".parse::<Field>().is_err());
    }

    #[test]
    fn field_set_get_and_set() {
        let mut set: FieldSet<String> = FieldSet::default();
        set.set(Field::Title, "hello".to_string());
        assert_eq!(set.get(Field::Title), "hello");
        assert_eq!(set.get(Field::Author), "");
    }

    #[test]
    fn field_set_iterates_in_canonical_order() {
        let set = FieldSet::from_fn(|f| f.as_str().to_string());
        let order: Vec<Field> = set.iter().map(|(f, _)| f).collect();
        assert_eq!(order, Field::ALL.to_vec());
    }
}
