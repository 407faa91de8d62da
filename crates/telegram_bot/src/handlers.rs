use teloxide::{prelude::*, types::User};

use crate::ConfigParameters;

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    if !is_allowed(&cfg, msg.from.as_ref()) {
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };

    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = from.id.0;

    let turn = cfg.bookkeeper.handle(user_id, text).await;
    for reply in turn.replies {
        bot.send_message(msg.chat.id, reply).await?;
    }

    Ok(())
}

fn is_allowed(cfg: &ConfigParameters, from: Option<&User>) -> bool {
    let Some(from) = from else {
        return false;
    };
    match &cfg.allowed_users {
        None => true,
        Some(ids) => ids.contains(&from.id),
    }
}
