#![deny(clippy::all)]
mod error;
pub mod resources;

use log::debug;
use once_cell::sync::Lazy;
use reqwest::{
    blocking::Client as HttpClient,
    header::{self, HeaderMap, HeaderValue},
    Method, Proxy, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use url::Url;

use crate::resources::{folder, group, recorder, user, DataSvcEnvelope, Listing};

pub use crate::{
    error::{Error, Result},
    resources::{
        folder::Folder,
        group::Group,
        recorder::{Id as RecorderId, RemoteRecorder, RemoteRecorderDetail},
        user::User,
        DotNetDate, ListPage,
    },
};

const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 240;

pub static DEFAULT_ENDPOINT: Lazy<Url> =
    Lazy::new(|| Url::parse("https://demo.cloud.panopto.eu").expect("Default URL is well-formed"));

/// The value of the console's `.ASPXAUTH` session cookie. Obtaining it is
/// the caller's responsibility; the client only carries it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCookie(pub String);

pub struct Config {
    pub endpoint: Url,
    pub session_cookie: SessionCookie,
    pub accept_invalid_certificates: bool,
    pub proxy: Option<Url>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: DEFAULT_ENDPOINT.clone(),
            session_cookie: SessionCookie("".to_owned()),
            accept_invalid_certificates: false,
            proxy: None,
        }
    }
}

#[derive(Debug)]
pub struct Client {
    endpoints: Endpoints,
    http_client: HttpClient,
    headers: HeaderMap,
}

impl Client {
    /// Create a new API client.
    pub fn new(config: Config) -> Result<Client> {
        let http_client = build_http_client(&config)?;
        let headers = build_headers(&config)?;
        let endpoints = Endpoints::new(config.endpoint)?;
        Ok(Client {
            endpoints,
            http_client,
            headers,
        })
    }

    /// Get the base url for the client
    pub fn base_url(&self) -> &Url {
        &self.endpoints.base
    }

    /// Get one page of the folder listing.
    pub fn get_folders_page(&self, page: u32, page_size: usize) -> Result<ListPage<Folder>> {
        let request = folder::ListRequest::new(page, page_size);
        let listing = self
            .post::<_, DataSvcEnvelope<Listing<Folder>>>(self.endpoints.get_folders.clone(), &request)?
            .d;
        Ok(ListPage {
            total: listing.total_number,
            results: listing.results,
        })
    }

    /// Iterate over all folders, page by page.
    pub fn folders_iter(&self, page_size: usize) -> ListPages<'_, Folder> {
        ListPages::new(TotalPolicy::Declared, page_size, 0, move |page| {
            self.get_folders_page(page, page_size)
        })
    }

    /// Get one page of the remote recorder listing.
    pub fn get_remote_recorders_page(
        &self,
        page: u32,
        page_size: usize,
    ) -> Result<ListPage<RemoteRecorder>> {
        let request = recorder::ListRequest::new(page, page_size);
        let listing = self
            .post::<_, DataSvcEnvelope<Listing<RemoteRecorder>>>(
                self.endpoints.get_remote_recorders.clone(),
                &request,
            )?
            .d;
        Ok(ListPage {
            total: listing.total_number,
            results: listing.results,
        })
    }

    /// Iterate over all remote recorders, page by page.
    pub fn remote_recorders_iter(&self, page_size: usize) -> ListPages<'_, RemoteRecorder> {
        ListPages::new(TotalPolicy::Declared, page_size, 0, move |page| {
            self.get_remote_recorders_page(page, page_size)
        })
    }

    /// Get the full device/config object for a single remote recorder.
    pub fn get_remote_recorder(&self, id: &RecorderId) -> Result<RemoteRecorderDetail> {
        self.get(self.endpoints.remote_recorder_by_id(id)?)
    }

    /// Get one page of the group listing. The endpoint returns a bare array
    /// and never declares a total.
    pub fn get_groups_page(&self, page: u32, page_size: usize) -> Result<ListPage<Group>> {
        let query = group::ListQuery::new(page, page_size);
        let results: Vec<Group> = self.get_query(self.endpoints.groups.clone(), &query)?;
        Ok(ListPage {
            total: None,
            results,
        })
    }

    /// Iterate over all groups, page by page. Group pages are 1-indexed.
    pub fn groups_iter(&self, page_size: usize) -> ListPages<'_, Group> {
        ListPages::new(TotalPolicy::InferFromShortPage, page_size, 1, move |page| {
            self.get_groups_page(page, page_size)
        })
    }

    /// Get one page of the user listing.
    pub fn get_users_page(&self, page: u32, page_size: usize) -> Result<ListPage<User>> {
        let request = user::ListRequest::new(page, page_size);
        let listing = self
            .post::<_, DataSvcEnvelope<Listing<User>>>(self.endpoints.get_users.clone(), &request)?
            .d;
        Ok(ListPage {
            total: listing.total_number,
            results: listing.results,
        })
    }

    /// Iterate over all users, page by page.
    pub fn users_iter(&self, page_size: usize) -> ListPages<'_, User> {
        ListPages::new(TotalPolicy::Declared, page_size, 0, move |page| {
            self.get_users_page(page, page_size)
        })
    }

    fn get<SuccessT>(&self, url: Url) -> Result<SuccessT>
    where
        SuccessT: DeserializeOwned,
    {
        self.request::<(), (), SuccessT>(Method::GET, url, None, None)
    }

    fn get_query<QueryT, SuccessT>(&self, url: Url, query: &QueryT) -> Result<SuccessT>
    where
        QueryT: Serialize,
        SuccessT: DeserializeOwned,
    {
        self.request::<QueryT, (), SuccessT>(Method::GET, url, Some(query), None)
    }

    fn post<RequestT, SuccessT>(&self, url: Url, body: &RequestT) -> Result<SuccessT>
    where
        RequestT: Serialize,
        SuccessT: DeserializeOwned,
    {
        self.request::<(), RequestT, SuccessT>(Method::POST, url, None, Some(body))
    }

    fn request<QueryT, RequestT, SuccessT>(
        &self,
        method: Method,
        url: Url,
        query: Option<&QueryT>,
        body: Option<&RequestT>,
    ) -> Result<SuccessT>
    where
        QueryT: Serialize,
        RequestT: Serialize,
        SuccessT: DeserializeOwned,
    {
        debug!("Attempting {} `{}`", method, url);
        let mut request = self
            .http_client
            .request(method.clone(), url.clone())
            .headers(self.headers.clone());
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let http_response = request.send().map_err(|source| Error::Http {
            message: format!("{method} operation failed."),
            source,
        })?;

        let status = http_response.status();
        if !status.is_success() {
            return Err(status_error(status, http_response.text().unwrap_or_default()));
        }
        http_response
            .json::<SuccessT>()
            .map_err(Error::BadJsonResponse)
    }
}

fn status_error(status_code: StatusCode, message: String) -> Error {
    if status_code == StatusCode::UNAUTHORIZED || status_code == StatusCode::FORBIDDEN {
        Error::Auth { status_code }
    } else {
        Error::Api {
            status_code,
            message,
        }
    }
}

/// Whether a listing declares its total up front or exhaustion has to be
/// inferred from a short page.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TotalPolicy {
    Declared,
    InferFromShortPage,
}

type PageFetch<'a, T> = Box<dyn Fn(u32) -> Result<ListPage<T>> + 'a>;

/// A finite, non-restartable iterator over the pages of a listing endpoint.
///
/// The declared total is latched from the first page only; totals reported
/// by later pages are ignored to tolerate server-side inconsistency. An
/// empty page always terminates iteration, even when the latched total says
/// more records should exist. A failed page fetch yields the error and ends
/// the iteration.
pub struct ListPages<'a, T> {
    fetch_page: PageFetch<'a, T>,
    policy: TotalPolicy,
    page_size: usize,
    next_page: u32,
    fetched: usize,
    total: Option<usize>,
    total_latched: bool,
    done: bool,
}

impl<'a, T> ListPages<'a, T> {
    pub fn new(
        policy: TotalPolicy,
        page_size: usize,
        first_page: u32,
        fetch_page: impl Fn(u32) -> Result<ListPage<T>> + 'a,
    ) -> Self {
        ListPages {
            fetch_page: Box::new(fetch_page),
            policy,
            page_size,
            next_page: first_page,
            fetched: 0,
            total: None,
            total_latched: false,
            done: false,
        }
    }

    /// The total declared by the first page, if the endpoint reports one.
    pub fn total(&self) -> Option<usize> {
        self.total
    }

    pub fn num_fetched(&self) -> usize {
        self.fetched
    }
}

impl<'a, T> Iterator for ListPages<'a, T> {
    type Item = Result<Vec<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let page = match (self.fetch_page)(self.next_page) {
            Ok(page) => page,
            Err(error) => {
                self.done = true;
                return Some(Err(error));
            }
        };
        if !self.total_latched {
            self.total = page.total;
            self.total_latched = true;
        }
        self.next_page += 1;
        self.fetched += page.results.len();
        self.done = page.results.is_empty()
            || self.total.is_some_and(|total| self.fetched >= total)
            || (self.policy == TotalPolicy::InferFromShortPage
                && page.results.len() < self.page_size);
        Some(Ok(page.results))
    }
}

#[derive(Debug)]
struct Endpoints {
    base: Url,
    get_folders: Url,
    get_remote_recorders: Url,
    get_users: Url,
    groups: Url,
}

impl Endpoints {
    fn new(base: Url) -> Result<Self> {
        let get_folders = construct_endpoint(&base, &["Panopto", "Services", "Data.svc", "GetFolders"])?;
        let get_remote_recorders =
            construct_endpoint(&base, &["Panopto", "Services", "Data.svc", "GetRemoteRecorders"])?;
        let get_users = construct_endpoint(&base, &["Panopto", "Services", "Data.svc", "GetUsers"])?;
        let groups = construct_endpoint(&base, &["Panopto", "Api", "Groups"])?;
        Ok(Endpoints {
            base,
            get_folders,
            get_remote_recorders,
            get_users,
            groups,
        })
    }

    fn remote_recorder_by_id(&self, id: &RecorderId) -> Result<Url> {
        construct_endpoint(&self.base, &["Panopto", "Api", "RemoteRecorders", &id.0])
    }
}

fn construct_endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut endpoint = base.clone();

    let mut endpoint_segments = endpoint
        .path_segments_mut()
        .map_err(|_| Error::BadEndpoint {
            endpoint: base.clone(),
        })?;

    for segment in segments {
        endpoint_segments.push(segment);
    }

    drop(endpoint_segments);

    Ok(endpoint)
}

fn build_http_client(config: &Config) -> Result<HttpClient> {
    let mut builder = HttpClient::builder()
        .gzip(true)
        .danger_accept_invalid_certs(config.accept_invalid_certificates)
        .timeout(Some(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS)));

    if let Some(proxy) = config.proxy.clone() {
        builder = builder.proxy(Proxy::all(proxy).map_err(Error::BuildHttpClient)?);
    }
    builder.build().map_err(Error::BuildHttpClient)
}

fn build_headers(config: &Config) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut cookie =
        HeaderValue::from_str(&format!(".ASPXAUTH={}", &config.session_cookie.0))
            .map_err(|_| Error::BadSessionCookie)?;
    cookie.set_sensitive(true);
    headers.insert(header::COOKIE, cookie);
    Ok(headers)
}
