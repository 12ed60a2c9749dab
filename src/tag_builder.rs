use crate::document::Tag;
use crate::introspection::ClassDescriptor;
use crate::type_converter::convert_optional_text;

/// Builds the tag describing a resource class.
///
/// Callers only pass named classes; an unnamed class yields an empty tag name.
pub fn build_tag(class: &ClassDescriptor) -> Tag {
    Tag {
        name: class.name.clone().unwrap_or_default(),
        description: convert_optional_text(class.description.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspection::Text;

    #[test]
    fn test_build_tag() {
        let mut class = ClassDescriptor::new("Widget").with_method("find", true);
        class.description = Some(Text::Lines(vec!["Widgets".to_string(), "for sale".to_string()]));

        let tag = build_tag(&class);

        assert_eq!(tag.name, "Widget");
        assert_eq!(tag.description.as_deref(), Some("Widgets\nfor sale"));
    }

    #[test]
    fn test_build_tag_without_description() {
        let tag = build_tag(&ClassDescriptor::new("Widget"));
        assert_eq!(tag.description, None);
    }
}
