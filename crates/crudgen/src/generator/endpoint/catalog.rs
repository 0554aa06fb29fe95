//! The built-in endpoint catalog.
//!
//! One [`EndpointSpec`] per tag, in canonical order. Everything
//! entity-specific is deferred behind the descriptor-driven factory
//! functions, so the table itself is a plain static.

use proc_macro2::TokenStream;
use quote::quote;

use super::{
  spec::EndpointSpec,
  tags::{EndpointTag, GuardAction},
};
use crate::generator::{
  ast::{GuardExpr, HandlerParam, ParamBinding, ReturnShape, TypeRef},
  descriptor::{ModelDescriptor, PayloadRole},
};

static CATALOG: &[EndpointSpec] = &[
  EndpointSpec {
    tag: EndpointTag::GetOne,
    method_name: "get_one",
    security: read_guard,
    return_shape: detail_json,
    params: &[id_path_param],
    body: get_one_body,
  },
  EndpointSpec {
    tag: EndpointTag::GetAll,
    method_name: "get_all",
    security: read_guard,
    return_shape: summary_list_json,
    params: &[],
    body: get_all_body,
  },
  EndpointSpec {
    tag: EndpointTag::GetPage,
    method_name: "get_page",
    security: read_guard,
    return_shape: summary_page,
    params: &[page_query_param],
    body: get_page_body,
  },
  EndpointSpec {
    tag: EndpointTag::Post,
    method_name: "create",
    security: write_guard,
    return_shape: detail_created,
    params: &[create_body_param],
    body: create_body,
  },
  EndpointSpec {
    tag: EndpointTag::Put,
    method_name: "replace",
    security: write_guard,
    return_shape: detail_json,
    params: &[id_path_param, create_body_param],
    body: replace_body,
  },
  EndpointSpec {
    tag: EndpointTag::Patch,
    method_name: "update",
    security: write_guard,
    return_shape: detail_json,
    params: &[id_path_param, update_body_param],
    body: update_body,
  },
  EndpointSpec {
    tag: EndpointTag::Delete,
    method_name: "delete",
    security: delete_guard,
    return_shape: no_content,
    params: &[id_path_param],
    body: delete_body,
  },
  EndpointSpec {
    tag: EndpointTag::PostBatch,
    method_name: "create_batch",
    security: write_guard,
    return_shape: detail_list_created,
    params: &[create_batch_body_param],
    body: create_batch_body,
  },
  EndpointSpec {
    tag: EndpointTag::PutBatch,
    method_name: "replace_batch",
    security: write_guard,
    return_shape: detail_list_json,
    params: &[update_batch_body_param],
    body: replace_batch_body,
  },
  EndpointSpec {
    tag: EndpointTag::PatchBatch,
    method_name: "update_batch",
    security: write_guard,
    return_shape: detail_list_json,
    params: &[update_batch_body_param],
    body: update_batch_body,
  },
  EndpointSpec {
    tag: EndpointTag::DeleteBatch,
    method_name: "delete_batch",
    security: delete_guard,
    return_shape: no_content,
    params: &[update_batch_body_param],
    body: delete_batch_body,
  },
  EndpointSpec {
    tag: EndpointTag::DeleteByIds,
    method_name: "delete_by_ids",
    security: delete_guard,
    return_shape: no_content,
    params: &[ids_body_param],
    body: delete_by_ids_body,
  },
  EndpointSpec {
    tag: EndpointTag::FindByIds,
    method_name: "find_by_ids",
    security: read_guard,
    return_shape: summary_list_json,
    params: &[ids_body_param],
    body: find_by_ids_body,
  },
  EndpointSpec {
    tag: EndpointTag::Exists,
    method_name: "exists",
    security: read_guard,
    return_shape: bool_json,
    params: &[id_path_param],
    body: exists_body,
  },
  EndpointSpec {
    tag: EndpointTag::Count,
    method_name: "count",
    security: read_guard,
    return_shape: count_json,
    params: &[],
    body: count_body,
  },
  EndpointSpec {
    tag: EndpointTag::Search,
    method_name: "search",
    security: read_guard,
    return_shape: summary_page,
    params: &[page_query_param, filter_body_param],
    body: search_body,
  },
  EndpointSpec {
    tag: EndpointTag::Validate,
    method_name: "validate",
    security: write_guard,
    return_shape: violations_json,
    params: &[create_body_param],
    body: validate_body,
  },
  EndpointSpec {
    tag: EndpointTag::Export,
    method_name: "export",
    security: read_guard,
    return_shape: csv_text,
    params: &[],
    body: export_body,
  },
];

/// All built-in endpoint specs in canonical order.
pub fn catalog() -> &'static [EndpointSpec] {
  CATALOG
}

pub fn spec_for(tag: EndpointTag) -> Option<&'static EndpointSpec> {
  CATALOG.iter().find(|spec| spec.tag == tag)
}

// Guards

fn read_guard(descriptor: &ModelDescriptor) -> GuardExpr {
  descriptor.security.policy.expression(descriptor.entity(), GuardAction::Read)
}

fn write_guard(descriptor: &ModelDescriptor) -> GuardExpr {
  descriptor.security.policy.expression(descriptor.entity(), GuardAction::Write)
}

fn delete_guard(descriptor: &ModelDescriptor) -> GuardExpr {
  descriptor.security.policy.expression(descriptor.entity(), GuardAction::Delete)
}

// Return shapes

fn payload_ref(descriptor: &ModelDescriptor, role: PayloadRole) -> TypeRef {
  TypeRef::named(descriptor.payload_type(role).as_str())
}

fn detail_json(descriptor: &ModelDescriptor) -> ReturnShape {
  ReturnShape::Json(payload_ref(descriptor, PayloadRole::Detail))
}

fn detail_created(descriptor: &ModelDescriptor) -> ReturnShape {
  ReturnShape::Created(payload_ref(descriptor, PayloadRole::Detail))
}

fn detail_list_json(descriptor: &ModelDescriptor) -> ReturnShape {
  ReturnShape::Json(payload_ref(descriptor, PayloadRole::Detail).with_vec())
}

fn detail_list_created(descriptor: &ModelDescriptor) -> ReturnShape {
  ReturnShape::Created(payload_ref(descriptor, PayloadRole::Detail).with_vec())
}

fn summary_list_json(descriptor: &ModelDescriptor) -> ReturnShape {
  ReturnShape::Json(payload_ref(descriptor, PayloadRole::Summary).with_vec())
}

fn summary_page(descriptor: &ModelDescriptor) -> ReturnShape {
  ReturnShape::Page(payload_ref(descriptor, PayloadRole::Summary))
}

fn no_content(_descriptor: &ModelDescriptor) -> ReturnShape {
  ReturnShape::NoContent
}

fn bool_json(_descriptor: &ModelDescriptor) -> ReturnShape {
  ReturnShape::Json(TypeRef::parse("bool"))
}

fn count_json(_descriptor: &ModelDescriptor) -> ReturnShape {
  ReturnShape::Json(TypeRef::parse("u64"))
}

fn violations_json(_descriptor: &ModelDescriptor) -> ReturnShape {
  ReturnShape::Json(TypeRef::parse("string").with_vec())
}

fn csv_text(_descriptor: &ModelDescriptor) -> ReturnShape {
  ReturnShape::Text
}

// Parameters

fn id_path_param(descriptor: &ModelDescriptor) -> HandlerParam {
  HandlerParam::builder()
    .name("id")
    .binding(ParamBinding::Path)
    .ty(descriptor.id_ty().clone())
    .build()
}

fn page_query_param(_descriptor: &ModelDescriptor) -> HandlerParam {
  HandlerParam::builder()
    .name("page")
    .binding(ParamBinding::Query)
    .ty(TypeRef::named("PageRequest"))
    .build()
}

fn create_body_param(descriptor: &ModelDescriptor) -> HandlerParam {
  HandlerParam::builder()
    .name("payload")
    .binding(ParamBinding::Json)
    .ty(payload_ref(descriptor, PayloadRole::Create))
    .build()
}

fn update_body_param(descriptor: &ModelDescriptor) -> HandlerParam {
  HandlerParam::builder()
    .name("payload")
    .binding(ParamBinding::Json)
    .ty(payload_ref(descriptor, PayloadRole::Update))
    .build()
}

fn create_batch_body_param(descriptor: &ModelDescriptor) -> HandlerParam {
  HandlerParam::builder()
    .name("payloads")
    .binding(ParamBinding::Json)
    .ty(payload_ref(descriptor, PayloadRole::Create).with_vec())
    .build()
}

fn update_batch_body_param(descriptor: &ModelDescriptor) -> HandlerParam {
  HandlerParam::builder()
    .name("payloads")
    .binding(ParamBinding::Json)
    .ty(payload_ref(descriptor, PayloadRole::Update).with_vec())
    .build()
}

fn ids_body_param(descriptor: &ModelDescriptor) -> HandlerParam {
  HandlerParam::builder()
    .name("ids")
    .binding(ParamBinding::Json)
    .ty(descriptor.id_ty().clone().with_vec())
    .build()
}

fn filter_body_param(descriptor: &ModelDescriptor) -> HandlerParam {
  HandlerParam::builder()
    .name("filter")
    .binding(ParamBinding::Json)
    .ty(TypeRef::named(descriptor.filter_type().as_str()))
    .build()
}

// Bodies
//
// Bodies assume the handler preamble the writer emits: a `service` binding
// for the shared state, destructured extractor arguments named as above, and
// the module-local `ApiError`, `internal`, and `invalid` helpers.

fn get_one_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    let entity = service.find_by_id(&id).await.map_err(internal)?.ok_or(ApiError::NotFound)?;
    Ok(Json(service.to_detail(&entity)))
  }
}

fn get_all_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    let entities = service.list_all().await.map_err(internal)?;
    Ok(Json(entities.iter().map(|entity| service.to_summary(entity)).collect()))
  }
}

fn get_page_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    let page = service.list_page(&page).await.map_err(internal)?;
    Ok(Json(page.map(|entity| service.to_summary(&entity))))
  }
}

fn create_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    payload.validate().map_err(invalid)?;
    let entity = service.insert(service.from_create(payload)).await.map_err(internal)?;
    Ok((StatusCode::CREATED, Json(service.to_detail(&entity))))
  }
}

fn replace_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    payload.validate().map_err(invalid)?;
    let entity = service
      .replace(&id, service.from_create(payload))
      .await
      .map_err(internal)?
      .ok_or(ApiError::NotFound)?;
    Ok(Json(service.to_detail(&entity)))
  }
}

fn update_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    payload.validate().map_err(invalid)?;
    let current = service.find_by_id(&id).await.map_err(internal)?.ok_or(ApiError::NotFound)?;
    let entity = service
      .replace(&id, service.apply_update(current, payload))
      .await
      .map_err(internal)?
      .ok_or(ApiError::NotFound)?;
    Ok(Json(service.to_detail(&entity)))
  }
}

fn delete_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    if service.remove(&id).await.map_err(internal)? {
      Ok(StatusCode::NO_CONTENT)
    } else {
      Err(ApiError::NotFound)
    }
  }
}

fn create_batch_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    for payload in &payloads {
      payload.validate().map_err(invalid)?;
    }
    let entities = service
      .insert_batch(payloads.into_iter().map(|payload| service.from_create(payload)).collect())
      .await
      .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(entities.iter().map(|entity| service.to_detail(entity)).collect())))
  }
}

fn replace_batch_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    for payload in &payloads {
      payload.validate().map_err(invalid)?;
    }
    let mut entities = Vec::with_capacity(payloads.len());
    for payload in payloads {
      let id = payload.id().cloned().ok_or_else(|| ApiError::Invalid("batch element missing id".into()))?;
      let current = service.find_by_id(&id).await.map_err(internal)?.ok_or(ApiError::NotFound)?;
      let entity = service
        .replace(&id, service.apply_update(current, payload))
        .await
        .map_err(internal)?
        .ok_or(ApiError::NotFound)?;
      entities.push(service.to_detail(&entity));
    }
    Ok(Json(entities))
  }
}

fn update_batch_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    for payload in &payloads {
      payload.validate().map_err(invalid)?;
    }
    let mut entities = Vec::new();
    for payload in payloads {
      let Some(id) = payload.id().cloned() else {
        continue;
      };
      let Some(current) = service.find_by_id(&id).await.map_err(internal)? else {
        continue;
      };
      if let Some(entity) = service.replace(&id, service.apply_update(current, payload)).await.map_err(internal)? {
        entities.push(service.to_detail(&entity));
      }
    }
    Ok(Json(entities))
  }
}

fn delete_batch_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    let ids: Vec<_> = payloads.iter().filter_map(|payload| payload.id().cloned()).collect();
    service.remove_batch(&ids).await.map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
  }
}

fn delete_by_ids_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    service.remove_batch(&ids).await.map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
  }
}

fn find_by_ids_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    let entities = service.find_by_ids(&ids).await.map_err(internal)?;
    Ok(Json(entities.iter().map(|entity| service.to_summary(entity)).collect()))
  }
}

fn exists_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    Ok(Json(service.exists(&id).await.map_err(internal)?))
  }
}

fn count_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    Ok(Json(service.count().await.map_err(internal)?))
  }
}

fn search_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    let page = service.search(&filter, &page).await.map_err(internal)?;
    Ok(Json(page.map(|entity| service.to_summary(&entity))))
  }
}

fn validate_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    match payload.validate() {
      Ok(()) => Ok(Json(Vec::new())),
      Err(errors) => Ok(Json(errors.to_string().lines().map(str::to_owned).collect())),
    }
  }
}

fn export_body(_descriptor: &ModelDescriptor) -> TokenStream {
  quote! {
    let entities = service.list_all().await.map_err(internal)?;
    let mut lines = vec![service.export_header().join(",")];
    lines.extend(entities.iter().map(|entity| service.export_row(entity).join(",")));
    Ok(([(axum::http::header::CONTENT_TYPE, "text/csv; charset=utf-8")], lines.join("\n")).into_response())
  }
}
