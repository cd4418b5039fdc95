use std::sync::PoisonError;

use tracing::debug;

use crate::naming::permission_logical_id;
use crate::template::SharedTemplate;
use crate::types::{FunctionDefinition, FunctionRef, LambdaPermission};

/// Writes topic-invocation permissions into the shared template.
///
/// Runs during the synchronous template-build phase, before any remote call.
#[derive(Clone)]
pub struct ResourceSynthesizer {
    template: SharedTemplate,
}

impl ResourceSynthesizer {
    pub fn new(template: SharedTemplate) -> Self {
        ResourceSynthesizer { template }
    }

    /// Register the permission letting `topic_name` invoke the function known
    /// as `function_key`.
    ///
    /// The logical name is derived from the inputs alone, so registering the
    /// same pair again overwrites the entry with an identical value.
    pub fn add_event_permission(
        &self,
        function_key: &str,
        function: &FunctionDefinition,
        topic_name: &str,
    ) {
        let function_ref = FunctionRef::new(function_key);
        let logical_id = permission_logical_id(function_key, topic_name);
        let permission = LambdaPermission::for_topic(&function_ref, topic_name);

        debug!(
            event = "AddEventPermission",
            phase = "Synthesized",
            function = function.name,
            function_resource = function_ref.logical_id(),
            topic = topic_name,
            resource = logical_id
        );

        // The build phase is single threaded; a poisoned lock still holds a usable template.
        let mut template = self.template.write().unwrap_or_else(PoisonError::into_inner);
        template.upsert(logical_id, permission.to_resource());
    }
}
