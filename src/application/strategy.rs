use super::controller::ButtonFlowController;
use crate::config::{ButtonInitializeOptions, SdkParams};
use crate::domain::ports::{CheckoutButtonStrategy, WidgetHostBox};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use tracing::{info, instrument};

/// The PayPal Commerce flavour of [`CheckoutButtonStrategy`].
///
/// Owns the flow controller and mounts the button through the widget host.
pub struct PaypalCommerceButtonStrategy {
    controller: ButtonFlowController,
    widget_host: WidgetHostBox,
    mounted_container: Option<String>,
}

impl PaypalCommerceButtonStrategy {
    pub fn new(controller: ButtonFlowController, widget_host: WidgetHostBox) -> Self {
        Self {
            controller,
            widget_host,
            mounted_container: None,
        }
    }

    /// The controller the widget callbacks are routed to.
    pub fn controller(&mut self) -> &mut ButtonFlowController {
        &mut self.controller
    }
}

#[async_trait]
impl CheckoutButtonStrategy for PaypalCommerceButtonStrategy {
    #[instrument(skip_all)]
    async fn initialize(&mut self, options: ButtonInitializeOptions) -> Result<()> {
        self.controller.initialize(options).await?;

        let (params, container_id) = match (self.controller.config(), self.controller.checkout())
        {
            (Some(config), Some(checkout)) => (
                SdkParams::new(config, &checkout.cart.currency.code),
                config.container_id.clone(),
            ),
            _ => return Err(CheckoutError::NotInitialized),
        };

        self.widget_host.load_sdk(&params).await?;
        self.widget_host.render_button(&container_id).await?;
        info!(%container_id, "paypal button rendered");
        self.mounted_container = Some(container_id);
        Ok(())
    }

    #[instrument(skip_all)]
    async fn deinitialize(&mut self) -> Result<()> {
        if let Some(container_id) = self.mounted_container.take() {
            self.widget_host.remove_container(&container_id).await?;
        }
        self.controller.deinitialize();
        Ok(())
    }
}
