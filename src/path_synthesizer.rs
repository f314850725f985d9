//! Builds the URL path template of an endpoint from the page's render link and the
//! handler's parameters.

use crate::application::PageLinkSource;
use crate::class_registry::{MethodDescriptor, ParameterKind};

/// Path template for `method` on the page whose root component is `page_class`.
///
/// Each non-injected parameter appends one segment: its static value when it has one,
/// `{name}` otherwise.
pub fn path_for(links: &dyn PageLinkSource, page_class: &str, method: &MethodDescriptor) -> String {
    append_segments(links.render_link_for(page_class), method)
}

/// Append the parameter segments of `method` to `base`
pub fn append_segments(base: String, method: &MethodDescriptor) -> String {
    method
        .parameters
        .iter()
        .fold(base, |mut path, parameter| {
            match &parameter.kind {
                ParameterKind::Injected => {}
                ParameterKind::StaticValue(value) => {
                    path.push('/');
                    path.push_str(value);
                }
                ParameterKind::PathSegment => {
                    path.push_str("/{");
                    path.push_str(&parameter.name);
                    path.push('}');
                }
            }
            path
        })
}
