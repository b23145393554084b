use crate::bridge;
use crate::dto::{
    DashboardDto, FacilityDto, LedgerDto, PhotoAttachment, ProfileFormDto, ReportDraft,
    SessionDto, TrainingOverviewDto,
};
use leptos::*;
use wasm_bindgen_futures::spawn_local;

const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Page {
    Dashboard,
    Training,
    Report,
    Facilities,
    Incentives,
    Profile,
}

impl Page {
    const ALL: [Page; 6] = [
        Page::Dashboard,
        Page::Training,
        Page::Report,
        Page::Facilities,
        Page::Incentives,
        Page::Profile,
    ];

    fn label(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Training => "Training",
            Page::Report => "Report Waste",
            Page::Facilities => "Facilities",
            Page::Incentives => "My Points",
            Page::Profile => "Profile",
        }
    }

    /// Dashboard, Training and Facilities are browsable while signed out;
    /// the rest prompt for sign-in first.
    fn requires_identity(self) -> bool {
        matches!(self, Page::Report | Page::Incentives | Page::Profile)
    }
}

fn filter_facilities(facilities: &[FacilityDto], query: &str, kind: &str) -> Vec<FacilityDto> {
    let needle = query.trim().to_lowercase();
    facilities
        .iter()
        .filter(|f| {
            let kind_ok = kind == "all" || f.kind == kind;
            let text_ok = needle.is_empty()
                || f.name.to_lowercase().contains(&needle)
                || f.city.to_lowercase().contains(&needle)
                || f.address.to_lowercase().contains(&needle);
            kind_ok && text_ok
        })
        .cloned()
        .collect()
}

fn status_label(status: &str) -> &'static str {
    match status {
        "in_progress" => "In progress",
        "completed" => "Completed",
        _ => "Not started",
    }
}

/// Transient feedback after a mutation or validation failure. The message
/// clears itself; load failures stay visible instead and go through `.set`.
fn flash(slot: RwSignal<Option<String>>, message: impl Into<String>) {
    slot.set(Some(message.into()));
    set_timeout(
        move || {
            let _ = slot.try_set(None);
        },
        std::time::Duration::from_secs(4),
    );
}

#[component]
pub fn App() -> impl IntoView {
    let session = create_rw_signal(None::<SessionDto>);
    let resolving = create_rw_signal(true);
    let page = create_rw_signal(Page::Dashboard);

    if bridge::stored_identity().is_some() {
        spawn_local(async move {
            match bridge::fetch_session().await {
                Ok(s) if s.user_id.is_some() => session.set(Some(s)),
                _ => bridge::forget_identity(),
            }
            resolving.set(false);
        });
    } else {
        resolving.set(false);
    }

    let sign_out = move || {
        bridge::forget_identity();
        session.set(None);
        page.set(Page::Dashboard);
    };

    view! {
      <Show
        when=move || !resolving.get()
        fallback=|| view! { <div class="loading">"Loading…"</div> }
      >
        <header class="topbar">
          <h1>"Swach Citizen Dashboard"</h1>
          <nav>
            {Page::ALL
                .iter()
                .map(|&p| {
                    view! {
                      <button
                        class:active=move || page.get() == p
                        on:click=move |_| page.set(p)
                      >
                        {p.label()}
                      </button>
                    }
                })
                .collect_view()}
          </nav>
          <Show
            when=move || session.get().is_some()
            fallback=move || view! {
              <button class="ghost" on:click=move |_| page.set(Page::Profile)>"Sign In"</button>
            }
          >
            <button class="ghost" on:click=move |_| sign_out()>"Sign Out"</button>
          </Show>
        </header>
        <main>
          {move || {
              let signed_in = session.get().is_some();
              let current = page.get();
              if current.requires_identity() && !signed_in {
                  return view! { <SignIn session=session/> }.into_view();
              }
              match current {
                  Page::Dashboard => view! { <DashboardView signed_in=signed_in/> }.into_view(),
                  Page::Training => view! { <TrainingView signed_in=signed_in/> }.into_view(),
                  Page::Report => view! { <ReportView/> }.into_view(),
                  Page::Facilities => view! { <FacilitiesView/> }.into_view(),
                  Page::Incentives => view! { <IncentivesView/> }.into_view(),
                  Page::Profile => view! { <ProfileView/> }.into_view(),
              }
          }}
        </main>
      </Show>
    }
}

#[component]
fn SignIn(session: RwSignal<Option<SessionDto>>) -> impl IntoView {
    let email = create_rw_signal(String::new());
    let error = create_rw_signal(None::<String>);

    let submit = move || {
        let address = email.get_untracked().trim().to_lowercase();
        if address.is_empty() || !address.contains('@') {
            error.set(Some("enter a valid email address".to_string()));
            return;
        }
        bridge::remember_identity(&address, Some(&address));
        spawn_local(async move {
            match bridge::sign_in().await {
                Ok(s) if s.user_id.is_some() => {
                    error.set(None);
                    session.set(Some(s));
                }
                Ok(_) => {
                    bridge::forget_identity();
                    error.set(Some("sign in required".to_string()));
                }
                Err(e) => {
                    bridge::forget_identity();
                    error.set(Some(e));
                }
            }
        });
    };

    view! {
      <section class="panel signin">
        <h2>"Sign in to Swach"</h2>
        <input
          prop:value=move || email.get()
          on:input=move |ev| email.set(event_target_value(&ev))
          placeholder="Email address"
        />
        <button on:click=move |_| submit()>"Sign In"</button>
        <Show when=move || error.get().is_some() fallback=|| ()>
          <pre class="error">{move || error.get().unwrap_or_default()}</pre>
        </Show>
      </section>
    }
}

#[component]
fn DashboardView(signed_in: bool) -> impl IntoView {
    if !signed_in {
        return view! {
          <section class="panel">
            <h2>"Welcome to Swach Sewa!"</h2>
            <p>"Join our community to track your progress, earn rewards, and make a difference!"</p>
            <div class="cards">
              <div class="card">
                <h3>"Training Modules"</h3>
                <div>"5+"</div>
                <div class="meta">"Learn waste management techniques"</div>
              </div>
              <div class="card">
                <h3>"Waste Facilities"</h3>
                <div>"50+"</div>
                <div class="meta">"Find collection centers near you"</div>
              </div>
              <div class="card">
                <h3>"Community Impact"</h3>
                <div>"1000+"</div>
                <div class="meta">"Reports submitted by users"</div>
              </div>
            </div>
          </section>
        }
        .into_view();
    }

    let summary = create_rw_signal(None::<DashboardDto>);
    let error = create_rw_signal(None::<String>);

    spawn_local(async move {
        match bridge::fetch_dashboard().await {
            Ok(s) => summary.set(Some(s)),
            Err(e) => error.set(Some(e)),
        }
    });

    view! {
      <section class="panel">
        <h2>"Overview"</h2>
        {move || summary.get().map(|s| {
          let verified = s.is_verified;
          view! {
          <div class="stack">
            <div>
              <b>{format!("Welcome, {}", s.full_name)}</b>
              " "
              <span class="meta">{format!("({})", s.role)}</span>
              <Show when=move || verified fallback=|| ()>
                <span class="badge ok">"verified"</span>
              </Show>
            </div>
            <div class="cards">
              <div class="card">
                <h3>"Training"</h3>
                <div>{format!("{} of {} modules", s.completed_modules, s.total_modules)}</div>
                <div class="meta">{format!("{:.0}% complete", s.percentage)}</div>
              </div>
              <div class="card">
                <h3>"Points"</h3>
                <div>{s.total_points}</div>
                <div class="meta">"earned so far"</div>
              </div>
            </div>
          </div>
        }})}
        <Show when=move || error.get().is_some() fallback=|| ()>
          <pre class="error">{move || error.get().unwrap_or_default()}</pre>
        </Show>
      </section>
    }
    .into_view()
}

#[component]
fn TrainingView(signed_in: bool) -> impl IntoView {
    let overview = create_rw_signal(None::<TrainingOverviewDto>);
    let error = create_rw_signal(None::<String>);
    let notice = create_rw_signal(None::<String>);
    let busy = create_rw_signal(None::<String>);

    let load = move || {
        spawn_local(async move {
            match bridge::fetch_training().await {
                Ok(v) => {
                    overview.set(Some(v));
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };
    load();

    let start = move |module_id: String| {
        busy.set(Some(module_id.clone()));
        spawn_local(async move {
            match bridge::start_module(&module_id).await {
                Ok(_) => {
                    notice.set(None);
                    load();
                }
                Err(e) => flash(error, e),
            }
            busy.set(None);
        });
    };

    let complete = move |module_id: String| {
        busy.set(Some(module_id.clone()));
        spawn_local(async move {
            match bridge::complete_module(&module_id).await {
                Ok(done) => {
                    flash(
                        notice,
                        format!(
                            "Module completed with a score of {}. You earned {} points!",
                            done.score, done.points_awarded
                        ),
                    );
                    load();
                }
                Err(e) => flash(error, e),
            }
            busy.set(None);
        });
    };

    view! {
      <section class="panel">
        <h2>"Training Modules"</h2>
        {move || overview.get().map(|v| {
          let summary_line = if signed_in {
              format!("{} of {} completed ({:.0}%)", v.completed, v.total, v.percentage)
          } else {
              "Sign in to start a module and track your progress.".to_string()
          };
          view! {
          <div class="meta">{summary_line}</div>
          <ul>
            <For
              each=move || v.modules.clone()
              key=|m| m.id.clone()
              children=move |m| {
                let start_id = m.id.clone();
                let complete_id = m.id.clone();
                let busy_id = m.id.clone();
                let mandatory = m.is_mandatory;
                let is_busy = move || busy.get().as_deref() == Some(busy_id.as_str());
                view! {
                  <li class="module">
                    <div>
                      <b>{m.title.clone()}</b>
                      " "
                      <span class="meta">{format!("{} min", m.duration_minutes)}</span>
                      <Show when=move || mandatory fallback=|| ()>
                        <span class="badge warn">"mandatory"</span>
                      </Show>
                    </div>
                    <div>{m.description.clone()}</div>
                    <div class="meta">
                      {status_label(&m.status)}
                      {m.score.map(|s| format!(" · score {s}")).unwrap_or_default()}
                    </div>
                    {if !signed_in {
                        ().into_view()
                    } else {
                        match m.status.as_str() {
                            "not_started" => view! {
                              <button
                                prop:disabled=is_busy.clone()
                                on:click=move |_| start(start_id.clone())
                              >"Start Module"</button>
                            }.into_view(),
                            "in_progress" => view! {
                              <button
                                prop:disabled=is_busy.clone()
                                on:click=move |_| complete(complete_id.clone())
                              >"Mark Complete"</button>
                            }.into_view(),
                            _ => view! { <span class="badge ok">"completed"</span> }.into_view(),
                        }
                    }}
                  </li>
                }
              }
            />
          </ul>
        }})}
        <Show when=move || notice.get().is_some() fallback=|| ()>
          <div class="notice">{move || notice.get().unwrap_or_default()}</div>
        </Show>
        <Show when=move || error.get().is_some() fallback=|| ()>
          <pre class="error">{move || error.get().unwrap_or_default()}</pre>
        </Show>
      </section>
    }
}

#[component]
fn ReportView() -> impl IntoView {
    let title = create_rw_signal(String::new());
    let description = create_rw_signal(String::new());
    let location = create_rw_signal(String::new());
    let coords = create_rw_signal(None::<(f64, f64)>);
    let photo = create_rw_signal(None::<PhotoAttachment>);
    let error = create_rw_signal(None::<String>);
    let notice = create_rw_signal(None::<String>);

    let use_my_location = move || {
        spawn_local(async move {
            match bridge::current_position().await {
                Ok((lat, lng)) => {
                    coords.set(Some((lat, lng)));
                    if location.get_untracked().trim().is_empty() {
                        location.set(format!("{lat:.5}, {lng:.5}"));
                    }
                    error.set(None);
                }
                Err(e) => flash(error, e),
            }
        });
    };

    let on_photo = move |ev: ev::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        let file = input.files().and_then(|list| list.get(0));
        match file {
            Some(file) if file.size() as u64 > MAX_PHOTO_BYTES => {
                photo.set(None);
                input.set_value("");
                flash(error, "please select a photo under 5MB");
            }
            Some(file) => {
                photo.set(Some(PhotoAttachment {
                    file_name: file.name(),
                    size_bytes: file.size() as u64,
                }));
                error.set(None);
            }
            None => photo.set(None),
        }
    };

    let submit = move || {
        let draft = ReportDraft {
            title: title.get_untracked().trim().to_string(),
            description: description.get_untracked().trim().to_string(),
            location: location.get_untracked().trim().to_string(),
            latitude: coords.get_untracked().map(|(lat, _)| lat),
            longitude: coords.get_untracked().map(|(_, lng)| lng),
            photo: photo.get_untracked(),
        };
        if draft.title.is_empty() || draft.location.is_empty() {
            flash(error, "please fill in title and location");
            return;
        }
        spawn_local(async move {
            match bridge::submit_report(&draft).await {
                Ok(receipt) => {
                    title.set(String::new());
                    description.set(String::new());
                    location.set(String::new());
                    coords.set(None);
                    photo.set(None);
                    error.set(None);
                    flash(
                        notice,
                        format!("Report submitted. You earned {} points!", receipt.points_awarded),
                    );
                }
                Err(e) => flash(error, e),
            }
        });
    };

    view! {
      <section class="panel">
        <h2>"Report Illegal Dumping"</h2>
        <div class="stack">
          <input
            prop:value=move || title.get()
            on:input=move |ev| title.set(event_target_value(&ev))
            placeholder="Title"
          />
          <textarea
            prop:value=move || description.get()
            on:input=move |ev| description.set(event_target_value(&ev))
            placeholder="Describe what you saw"
          />
          <div class="row">
            <input
              prop:value=move || location.get()
              on:input=move |ev| location.set(event_target_value(&ev))
              placeholder="Location"
            />
            <button on:click=move |_| use_my_location()>"Use My Location"</button>
          </div>
          <input type="file" accept="image/*" on:change=on_photo/>
          {move || photo.get().map(|p| view! {
            <div class="meta">{format!("Attached: {} ({} KB)", p.file_name, p.size_bytes / 1024)}</div>
          })}
          <button on:click=move |_| submit()>"Submit Report"</button>
        </div>
        <Show when=move || notice.get().is_some() fallback=|| ()>
          <div class="notice">{move || notice.get().unwrap_or_default()}</div>
        </Show>
        <Show when=move || error.get().is_some() fallback=|| ()>
          <pre class="error">{move || error.get().unwrap_or_default()}</pre>
        </Show>
      </section>
    }
}

#[component]
fn FacilitiesView() -> impl IntoView {
    let facilities = create_rw_signal(Vec::<FacilityDto>::new());
    let query = create_rw_signal(String::new());
    let kind = create_rw_signal("all".to_string());
    let error = create_rw_signal(None::<String>);

    spawn_local(async move {
        match bridge::fetch_facilities().await {
            Ok(list) => facilities.set(list),
            Err(e) => error.set(Some(e)),
        }
    });

    let visible = move || filter_facilities(&facilities.get(), &query.get(), &kind.get());

    view! {
      <section class="panel">
        <h2>"Waste Facilities"</h2>
        <div class="row">
          <input
            prop:value=move || query.get()
            on:input=move |ev| query.set(event_target_value(&ev))
            placeholder="Search by name, city or address"
          />
          <select on:change=move |ev| kind.set(event_target_value(&ev))>
            <option value="all">"All types"</option>
            <option value="biomethanization">"Biomethanization Plant"</option>
            <option value="waste_to_energy">"Waste-to-Energy Plant"</option>
            <option value="recycling">"Recycling Center"</option>
            <option value="scrap_collection">"Scrap Collection Hub"</option>
          </select>
        </div>
        <ul>
          <For
            each=visible
            key=|f| f.id.clone()
            children=move |f| {
              let url = f.directions_url.clone();
              view! {
                <li class="facility">
                  <div><b>{f.name.clone()}</b> " " <span class="badge">{f.label.clone()}</span></div>
                  <div>{format!("{}, {}", f.address, f.city)}</div>
                  <div class="meta">
                    {f.capacity_tons.map(|c| format!("capacity {c} tons")).unwrap_or_default()}
                    {f.phone.as_ref().map(|p| format!(" · {p}")).unwrap_or_default()}
                  </div>
                  <button on:click=move |_| bridge::open_external(&url)>"Get Directions"</button>
                </li>
              }
            }
          />
        </ul>
        <Show when=move || error.get().is_some() fallback=|| ()>
          <pre class="error">{move || error.get().unwrap_or_default()}</pre>
        </Show>
      </section>
    }
}

#[component]
fn IncentivesView() -> impl IntoView {
    let ledger = create_rw_signal(None::<LedgerDto>);
    let error = create_rw_signal(None::<String>);

    spawn_local(async move {
        match bridge::fetch_incentives().await {
            Ok(v) => ledger.set(Some(v)),
            Err(e) => error.set(Some(e)),
        }
    });

    view! {
      <section class="panel">
        <h2>"My Points"</h2>
        {move || ledger.get().map(|v| view! {
          <div class="card">
            <h3>"Total"</h3>
            <div>{v.total_points}</div>
          </div>
          <ul>
            <For
              each=move || v.entries.clone()
              key=|e| e.id.clone()
              children=move |e| view! {
                <li>
                  <div><b>{format!("+{}", e.points)}</b> " " {e.reason.clone()}</div>
                  <div class="meta">{e.created_at.clone()}</div>
                </li>
              }
            />
          </ul>
        })}
        <Show when=move || error.get().is_some() fallback=|| ()>
          <pre class="error">{move || error.get().unwrap_or_default()}</pre>
        </Show>
      </section>
    }
}

#[component]
fn ProfileView() -> impl IntoView {
    let role = create_rw_signal(String::new());
    let verified = create_rw_signal(false);
    let full_name = create_rw_signal(String::new());
    let phone = create_rw_signal(String::new());
    let address = create_rw_signal(String::new());
    let city = create_rw_signal(String::new());
    let state = create_rw_signal(String::new());
    let pincode = create_rw_signal(String::new());
    let error = create_rw_signal(None::<String>);
    let notice = create_rw_signal(None::<String>);

    spawn_local(async move {
        match bridge::fetch_profile().await {
            Ok(p) => {
                role.set(p.role);
                verified.set(p.is_verified);
                full_name.set(p.full_name);
                phone.set(p.phone);
                address.set(p.address);
                city.set(p.city);
                state.set(p.state);
                pincode.set(p.pincode);
            }
            Err(e) => error.set(Some(e)),
        }
    });

    let save = move || {
        let form = ProfileFormDto {
            full_name: full_name.get_untracked().trim().to_string(),
            phone: phone.get_untracked().trim().to_string(),
            address: address.get_untracked().trim().to_string(),
            city: city.get_untracked().trim().to_string(),
            state: state.get_untracked().trim().to_string(),
            pincode: pincode.get_untracked().trim().to_string(),
        };
        spawn_local(async move {
            match bridge::save_profile(&form).await {
                Ok(p) => {
                    full_name.set(p.full_name);
                    phone.set(p.phone);
                    address.set(p.address);
                    city.set(p.city);
                    state.set(p.state);
                    pincode.set(p.pincode);
                    error.set(None);
                    flash(notice, "Profile saved");
                }
                Err(e) => flash(error, e),
            }
        });
    };

    view! {
      <section class="panel">
        <h2>"My Profile"</h2>
        <div class="meta">
          {move || role.get()}
          <Show when=move || verified.get() fallback=|| ()>
            <span class="badge ok">"verified"</span>
          </Show>
        </div>
        <div class="stack">
          <input
            prop:value=move || full_name.get()
            on:input=move |ev| full_name.set(event_target_value(&ev))
            placeholder="Full name"
          />
          <input
            prop:value=move || phone.get()
            on:input=move |ev| phone.set(event_target_value(&ev))
            placeholder="Phone"
          />
          <input
            prop:value=move || address.get()
            on:input=move |ev| address.set(event_target_value(&ev))
            placeholder="Address"
          />
          <div class="row">
            <input
              prop:value=move || city.get()
              on:input=move |ev| city.set(event_target_value(&ev))
              placeholder="City"
            />
            <input
              prop:value=move || state.get()
              on:input=move |ev| state.set(event_target_value(&ev))
              placeholder="State"
            />
            <input
              prop:value=move || pincode.get()
              on:input=move |ev| pincode.set(event_target_value(&ev))
              placeholder="PIN code"
            />
          </div>
          <button on:click=move |_| save()>"Save Profile"</button>
        </div>
        <Show when=move || notice.get().is_some() fallback=|| ()>
          <div class="notice">{move || notice.get().unwrap_or_default()}</div>
        </Show>
        <Show when=move || error.get().is_some() fallback=|| ()>
          <pre class="error">{move || error.get().unwrap_or_default()}</pre>
        </Show>
      </section>
    }
}
