//! Bearer-authenticated info API lookups.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, ResponseError},
	http::{self, ApiHttpClient},
	obs::{self, RequestKind},
	oneclick::{self, OneClick},
};

/// Info API resources with dedicated shortcuts on [`OneClick`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum InfoEndpoint {
	/// Signed-in user's profile.
	Info,
	/// User's district.
	District,
	/// Profiles linked to the user.
	Profiles,
	/// Students linked to a parent account.
	Children,
	/// Groups the user belongs to.
	Groups,
	/// OneRoster view of the user.
	OneRosterInfo,
	/// OneRoster classes of the user.
	OneRosterClasses,
	/// Teachers of the class with the given sourced id.
	OneRosterClassTeachers(String),
	/// Students of the class with the given sourced id.
	OneRosterClassStudents(String),
}
impl InfoEndpoint {
	/// Path relative to the info API base.
	pub fn path(&self) -> String {
		match self {
			InfoEndpoint::Info => "v2/my/info".into(),
			InfoEndpoint::District => "v2/my/district".into(),
			InfoEndpoint::Profiles => "v2/my/profiles".into(),
			InfoEndpoint::Children => "v2/my/students".into(),
			InfoEndpoint::Groups => "my/groups".into(),
			InfoEndpoint::OneRosterInfo => "v2/oneroster/my/info".into(),
			InfoEndpoint::OneRosterClasses => "v2/oneroster/my/classes".into(),
			InfoEndpoint::OneRosterClassTeachers(class_id) =>
				format!("v2/oneroster/my/classes/{class_id}/teachers"),
			InfoEndpoint::OneRosterClassStudents(class_id) =>
				format!("v2/oneroster/my/classes/{class_id}/students"),
		}
	}

	/// JSON member unwrapped from the response, if any.
	pub fn extract_node(&self) -> Option<&'static str> {
		match self {
			InfoEndpoint::OneRosterClassTeachers(_) => Some("teachers"),
			InfoEndpoint::OneRosterClassStudents(_) => Some("students"),
			_ => None,
		}
	}
}

impl<C> OneClick<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Fetches `path` (relative to the info endpoint) with `Authorization: Bearer <bearer>`.
	///
	/// Without `extract_node` the whole JSON document is returned. With it, the named member of
	/// an object document (or of the first element of an array document) is returned instead.
	pub async fn info(
		&self,
		bearer: &str,
		path: &str,
		extract_node: Option<&str>,
	) -> Result<Value> {
		obs::observe(RequestKind::Info, "info", async move {
			let url = self
				.config()
				.info_endpoint()
				.join(path)
				.map_err(|source| ConfigError::invalid_url(path, source))?;
			let request = http::bearer_get_request(&url, bearer)?;
			let response = http::execute(self.http_client(), request).await?;

			oneclick::ensure_success(&response)?;

			let document = oneclick::parse_json(&response)?;

			match extract_node {
				Some(node) => extract(document, node, path),
				None => Ok(document),
			}
		})
		.await
	}

	/// Fetches one of the predefined [`InfoEndpoint`]s.
	pub async fn endpoint(&self, bearer: &str, endpoint: &InfoEndpoint) -> Result<Value> {
		self.info(bearer, &endpoint.path(), endpoint.extract_node()).await
	}

	/// `v2/my/info`.
	pub async fn user_info(&self, bearer: &str) -> Result<Value> {
		self.endpoint(bearer, &InfoEndpoint::Info).await
	}

	/// `v2/my/district`.
	pub async fn user_district(&self, bearer: &str) -> Result<Value> {
		self.endpoint(bearer, &InfoEndpoint::District).await
	}

	/// `v2/my/profiles`.
	pub async fn user_profiles(&self, bearer: &str) -> Result<Value> {
		self.endpoint(bearer, &InfoEndpoint::Profiles).await
	}

	/// `v2/my/students`.
	pub async fn user_children(&self, bearer: &str) -> Result<Value> {
		self.endpoint(bearer, &InfoEndpoint::Children).await
	}

	/// `my/groups`.
	pub async fn user_groups(&self, bearer: &str) -> Result<Value> {
		self.endpoint(bearer, &InfoEndpoint::Groups).await
	}

	/// `v2/oneroster/my/info`.
	pub async fn user_oneroster_info(&self, bearer: &str) -> Result<Value> {
		self.endpoint(bearer, &InfoEndpoint::OneRosterInfo).await
	}

	/// `v2/oneroster/my/classes`.
	pub async fn user_oneroster_classes(&self, bearer: &str) -> Result<Value> {
		self.endpoint(bearer, &InfoEndpoint::OneRosterClasses).await
	}

	/// Teachers of one class, unwrapped from the `teachers` member.
	pub async fn user_oneroster_class_teachers(
		&self,
		bearer: &str,
		class_id: &str,
	) -> Result<Value> {
		self.endpoint(bearer, &InfoEndpoint::OneRosterClassTeachers(class_id.into())).await
	}

	/// Students of one class, unwrapped from the `students` member.
	pub async fn user_oneroster_class_students(
		&self,
		bearer: &str,
		class_id: &str,
	) -> Result<Value> {
		self.endpoint(bearer, &InfoEndpoint::OneRosterClassStudents(class_id.into())).await
	}
}

fn extract(document: Value, node: &str, endpoint: &str) -> Result<Value> {
	let holder = match document {
		Value::Array(items) => items.into_iter().next(),
		other => Some(other),
	};

	let value = match holder {
		Some(Value::Object(mut members)) => members.remove(node),
		_ => None,
	};

	value.ok_or_else(|| {
		ResponseError::MissingNode { node: node.to_owned(), endpoint: endpoint.to_owned() }.into()
	})
}
