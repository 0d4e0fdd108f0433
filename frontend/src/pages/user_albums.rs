use shared::models::{Album, Photo};
use yew::prelude::*;

use crate::hooks::{use_app, use_fetch};

#[derive(Properties, PartialEq)]
pub struct UserAlbumsProps {
    pub user_id: u32,
}

#[function_component(UserAlbums)]
pub fn user_albums(props: &UserAlbumsProps) -> Html {
    let app = use_app();
    let selected = use_state(|| None::<u32>);
    let albums = {
        let api = app.api.clone();
        use_fetch(props.user_id, move |user_id| async move { api.user_albums(user_id).await })
    };
    let photos = {
        let api = app.api.clone();
        use_fetch(*selected, move |album_id| async move {
            match album_id {
                Some(album_id) => api.album_photos(album_id).await,
                None => Ok(Vec::new()),
            }
        })
    };

    let album_item = |album: &Album| {
        let id = album.id;
        let onclick = {
            let selected = selected.clone();
            Callback::from(move |_: MouseEvent| selected.set(Some(id)))
        };
        html! {
            <li key={id} class={classes!("album-item", (*selected == Some(id)).then_some("active"))}>
                <button class="link-button" {onclick}>{ &album.title }</button>
            </li>
        }
    };

    html! {
        <div class="container">
            <h2>{ format!("Albums for user {}", props.user_id) }</h2>
            { albums.view(|albums| html! {
                <ul class="album-list">
                    { for albums.iter().map(album_item) }
                </ul>
            }) }
            if selected.is_some() {
                { photos.view(|photos| html! {
                    <div class="photo-grid">
                        { for photos.iter().map(photo_item) }
                    </div>
                }) }
            }
        </div>
    }
}

fn photo_item(photo: &Photo) -> Html {
    html! {
        <a key={photo.id} class="photo" href={photo.url.clone()} target="_blank">
            <img src={photo.thumbnail_url.clone()} alt={photo.title.clone()} />
        </a>
    }
}
